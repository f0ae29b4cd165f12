//! Transaction log handlers (dashboard)

use axum::Extension;
use axum::extract::{Query, State};
use shared::error::ApiResponse;
use shared::models::{TransactionPage, TransactionQuery, TransactionStats};

use crate::api::ApiResult;
use crate::auth::AuthedMerchant;
use crate::state::AppState;

/// GET /api/transactions?limit&offset&currency&startDate&endDate
pub async fn list(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<ApiResponse<TransactionPage>> {
    let page = state.transactions.query(&authed.merchant_id, &query).await?;
    Ok(axum::Json(ApiResponse::success(page)))
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<TransactionStats>> {
    let stats = state.transactions.stats(&authed.merchant_id).await;
    Ok(axum::Json(ApiResponse::success(stats)))
}

/// DELETE /api/transactions — wipe the merchant's log (dashboard reset)
pub async fn reset(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<()>> {
    state.transactions.clear(&authed.merchant_id).await;
    tracing::info!(merchant_id = %authed.merchant_id, "Transaction log reset");
    Ok(axum::Json(ApiResponse::ok()))
}
