//! Processor account linkage handlers

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;
use shared::error::{AppError, ApiResponse};
use shared::models::{MerchantPublic, ProcessorStatus};

use crate::api::ApiResult;
use crate::auth::AuthedMerchant;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProcessorLinkRequest {
    pub account_id: String,
    #[serde(default)]
    pub status: Option<ProcessorStatus>,
}

/// POST /api/merchant/processor-link — record a linked processor account.
/// The status defaults to `pending` until the processor confirms onboarding.
pub async fn link_processor(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
    axum::Json(req): axum::Json<ProcessorLinkRequest>,
) -> ApiResult<ApiResponse<MerchantPublic>> {
    if req.account_id.trim().is_empty() {
        return Err(AppError::validation("account_id is required"));
    }
    let status = req.status.unwrap_or(ProcessorStatus::Pending);
    let merchant = state
        .merchants
        .set_processor_link(&authed.merchant_id, Some((req.account_id, status)))
        .await?;
    tracing::info!(merchant_id = %merchant.id, "Processor account linked");
    Ok(axum::Json(ApiResponse::success(merchant)))
}

/// DELETE /api/merchant/processor-link — unlink, clearing id and status.
pub async fn unlink_processor(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<MerchantPublic>> {
    let merchant = state
        .merchants
        .set_processor_link(&authed.merchant_id, None)
        .await?;
    Ok(axum::Json(ApiResponse::success(merchant)))
}
