//! Branding settings handlers

use axum::Extension;
use axum::extract::State;
use shared::error::{AppError, ApiResponse, ErrorCode};
use shared::models::{MerchantSettings, SettingsUpdate};

use crate::api::ApiResult;
use crate::auth::AuthedMerchant;
use crate::state::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<MerchantSettings>> {
    let settings = state
        .merchants
        .settings(&authed.merchant_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::SettingsNotFound))?;
    Ok(axum::Json(ApiResponse::success(settings)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    axum::Json(update): axum::Json<SettingsUpdate>,
) -> ApiResult<ApiResponse<MerchantSettings>> {
    let settings = state
        .merchants
        .update_settings(&authed.merchant_id, update)
        .await?;
    Ok(axum::Json(ApiResponse::success(settings)))
}
