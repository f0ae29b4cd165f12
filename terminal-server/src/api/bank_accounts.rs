//! Payout bank account handlers

use axum::Extension;
use axum::extract::{Path, State};
use shared::error::{AppError, ApiResponse};
use shared::models::{BankAccount, BankAccountCreate};

use crate::api::ApiResult;
use crate::auth::AuthedMerchant;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<Vec<BankAccount>>> {
    let accounts = state.merchants.bank_accounts(&authed.merchant_id).await;
    Ok(axum::Json(ApiResponse::success(accounts)))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    axum::Json(req): axum::Json<BankAccountCreate>,
) -> ApiResult<ApiResponse<BankAccount>> {
    if req.holder_name.trim().is_empty()
        || req.bank_name.trim().is_empty()
        || req.account_number.trim().is_empty()
    {
        return Err(AppError::validation(
            "holder_name, bank_name and account_number are required",
        ));
    }
    let account = state
        .merchants
        .add_bank_account(&authed.merchant_id, req)
        .await?;
    Ok(axum::Json(ApiResponse::success(account)))
}

pub async fn set_default(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    Path(account_id): Path<String>,
) -> ApiResult<ApiResponse<BankAccount>> {
    let account = state
        .merchants
        .set_default_bank_account(&authed.merchant_id, &account_id)
        .await?;
    Ok(axum::Json(ApiResponse::success(account)))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    Path(account_id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    state
        .merchants
        .delete_bank_account(&authed.merchant_id, &account_id)
        .await?;
    Ok(axum::Json(ApiResponse::ok()))
}
