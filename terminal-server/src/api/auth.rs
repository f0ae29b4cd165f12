//! Merchant auth handlers
//!
//! POST /api/auth/signup — create merchant + session, set cookie
//! POST /api/auth/login  — verify credentials, set cookie
//! POST /api/auth/logout — delete session, clear cookie
//! GET  /api/auth/me     — current merchant (behind session middleware)

use axum::Extension;
use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use shared::error::{AppError, ApiResponse};
use shared::models::MerchantPublic;

use crate::api::ApiResult;
use crate::auth::{self, AuthedMerchant, SESSION_COOKIE};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub business_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Attach a freshly issued session cookie to a JSON success response.
async fn respond_with_session(
    state: &AppState,
    merchant: MerchantPublic,
) -> Result<Response, AppError> {
    let token = state.sessions.create(&merchant.id).await;
    let cookie = auth::session_cookie(&token, state.secure_cookies());

    let mut resp = axum::Json(ApiResponse::success(merchant)).into_response();
    resp.headers_mut().append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| AppError::internal("Invalid cookie value"))?,
    );
    Ok(resp)
}

pub async fn signup(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<SignupRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let merchant = state
        .merchants
        .create(&email, &req.password, req.business_name.trim())
        .await?;
    tracing::info!(merchant_id = %merchant.id, "Merchant signed up");
    respond_with_session(&state, merchant).await
}

pub async fn login(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    let merchant = state
        .merchants
        .authenticate(&email, &req.password)
        .await
        .ok_or_else(AppError::invalid_credentials)?;
    respond_with_session(&state, merchant).await
}

/// Logout is public: it deletes whatever session the cookie names and
/// always clears the cookie, so a stale token still logs out cleanly.
pub async fn logout(State(state): State<AppState>, request: Request) -> Response {
    if let Some(token) = auth::cookie_value(request.headers(), SESSION_COOKIE) {
        state.sessions.delete(&token).await;
    }
    let mut resp = axum::Json(ApiResponse::ok()).into_response();
    resp.headers_mut()
        .append(SET_COOKIE, auth::clear_cookie_header());
    resp
}

pub async fn me(
    State(state): State<AppState>,
    Extension(authed): Extension<AuthedMerchant>,
) -> ApiResult<ApiResponse<MerchantPublic>> {
    let merchant = state
        .merchants
        .get(&authed.merchant_id)
        .await
        .ok_or_else(|| AppError::not_found("Merchant"))?;
    Ok(axum::Json(ApiResponse::success(merchant)))
}
