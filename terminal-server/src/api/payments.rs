//! Terminal payment flow handlers
//!
//! POST /api/payments/session     — hosted checkout (amount from the numpad)
//! POST /api/payments/save-card   — save a card on file for a phone number
//! POST /api/payments/saved-card  — off-session charge against a saved card
//! GET  /api/payments/{id}/status — terminal polling endpoint
//!
//! The charge path runs the full guard chain before touching the processor:
//! amount bounds, sliding-window rate limit, daily amount quota. The daily
//! total is committed only after the processor accepts the charge, and a
//! processor failure discards the tracked session so nothing is recorded.

use axum::extract::{ConnectInfo, Path, State};
use chrono::Local;
use http::HeaderMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ApiResponse, ErrorCode};
use shared::models::{Customer, TransactionCreate};
use std::net::SocketAddr;

use crate::api::ApiResult;
use crate::guard::{QuotaGuard, ip_from_parts};
use crate::state::AppState;
use crate::{currency, stripe};

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub merchant_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub payment_url: String,
}

#[derive(Deserialize)]
pub struct SaveCardRequest {
    pub merchant_id: String,
    pub phone: String,
    pub payment_method_id: String,
    pub card_last4: String,
    pub card_brand: String,
}

#[derive(Deserialize)]
pub struct SavedCardChargeRequest {
    pub merchant_id: String,
    pub phone: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Serialize, Deserialize)]
pub struct SavedCardChargeResponse {
    pub session_id: String,
    pub transaction_id: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
}

/// POST /api/payments/session
pub async fn create_session(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    axum::Json(req): axum::Json<CreateSessionRequest>,
) -> ApiResult<ApiResponse<CreateSessionResponse>> {
    currency::validate_amount(req.amount, &req.currency)?;

    let ip = ip_from_parts(&headers, Some(peer));
    state.guard.admit(&ip, Some(req.amount)).await?;
    let quota_key = QuotaGuard::quota_key(&ip, Local::now());

    let session = state
        .payments
        .create(
            req.amount,
            &req.currency,
            req.merchant_id.as_deref(),
            &ip,
            &quota_key,
        )
        .await;

    let checkout = match stripe::create_checkout_session(
        &state.stripe_secret_key,
        req.amount,
        &req.currency,
        &session.id,
        &state.checkout_success_url,
        &state.checkout_cancel_url,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            // Nothing recorded: the tracked session goes away and the daily
            // total was never committed.
            state.payments.discard(&session.id).await;
            tracing::error!(error = %e, "Checkout session creation failed");
            return Err(AppError::processor("Failed to create checkout session"));
        }
    };

    state.guard.commit_amount(&quota_key, req.amount).await;
    tracing::info!(
        session_id = %session.id,
        amount = %req.amount,
        currency = %session.currency,
        "Checkout session created"
    );

    Ok(axum::Json(ApiResponse::success(CreateSessionResponse {
        session_id: session.id,
        payment_url: checkout.url,
    })))
}

/// POST /api/payments/save-card
pub async fn save_card(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    axum::Json(req): axum::Json<SaveCardRequest>,
) -> ApiResult<ApiResponse<Customer>> {
    if req.phone.trim().is_empty() || req.payment_method_id.trim().is_empty() {
        return Err(AppError::validation(
            "phone and payment_method_id are required",
        ));
    }

    let ip = ip_from_parts(&headers, Some(peer));
    state.guard.admit(&ip, None).await?;

    // Resolve the merchant before any processor call
    let merchant = state
        .merchants
        .get(&req.merchant_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::MerchantNotFound))?;

    let customer_id =
        match stripe::create_customer(&state.stripe_secret_key, &req.phone, &merchant.id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Customer creation failed");
                return Err(AppError::processor("Failed to save card"));
            }
        };
    if let Err(e) =
        stripe::attach_payment_method(&state.stripe_secret_key, &req.payment_method_id, &customer_id)
            .await
    {
        tracing::error!(error = %e, "Payment method attach failed");
        return Err(AppError::processor("Failed to save card"));
    }

    let customer = state
        .merchants
        .upsert_customer(
            &merchant.id,
            &req.phone,
            &customer_id,
            &req.card_last4,
            &req.card_brand,
            merchant.processor_account_id.clone(),
        )
        .await?;
    tracing::info!(merchant_id = %merchant.id, "Card saved on file");
    Ok(axum::Json(ApiResponse::success(customer)))
}

/// POST /api/payments/saved-card
pub async fn charge_saved_card(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    axum::Json(req): axum::Json<SavedCardChargeRequest>,
) -> ApiResult<ApiResponse<SavedCardChargeResponse>> {
    currency::validate_amount(req.amount, &req.currency)?;

    let ip = ip_from_parts(&headers, Some(peer));
    state.guard.admit(&ip, Some(req.amount)).await?;
    let quota_key = QuotaGuard::quota_key(&ip, Local::now());

    let customer = state
        .merchants
        .find_customer(&req.merchant_id, &req.phone)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    let session = state
        .payments
        .create(
            req.amount,
            &req.currency,
            Some(&req.merchant_id),
            &ip,
            &quota_key,
        )
        .await;

    let intent_id = match stripe::charge_saved_card(
        &state.stripe_secret_key,
        req.amount,
        &req.currency,
        &customer.processor_customer_id,
        &session.id,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            state.payments.discard(&session.id).await;
            tracing::error!(error = %e, "Saved-card charge failed");
            return Err(AppError::processor("Failed to charge saved card"));
        }
    };

    state.guard.commit_amount(&quota_key, req.amount).await;
    // Off-session charges confirm synchronously; no webhook round-trip
    let _ = state.payments.mark_completed(&session.id, &intent_id).await;
    let txn = state
        .transactions
        .append(
            &req.merchant_id,
            TransactionCreate {
                amount: req.amount,
                currency: req.currency.clone(),
                status: "completed".to_string(),
                processor_reference: Some(intent_id),
                customer_phone: Some(customer.phone.clone()),
                customer_email: None,
                card_summary: Some(format!(
                    "{} ****{}",
                    customer.card_brand, customer.card_last4
                )),
                location: None,
            },
        )
        .await;
    tracing::info!(
        transaction_id = %txn.id,
        merchant_id = %req.merchant_id,
        "Saved-card charge completed"
    );

    Ok(axum::Json(ApiResponse::success(SavedCardChargeResponse {
        session_id: session.id,
        transaction_id: txn.id,
        status: "paid".to_string(),
    })))
}

/// GET /api/payments/{id}/status — terminal polling
pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<ApiResponse<SessionStatusResponse>> {
    let session = state
        .payments
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::PaymentSessionNotFound))?;
    Ok(axum::Json(ApiResponse::success(SessionStatusResponse {
        status: session.poll_status().to_string(),
        amount: session.amount,
        currency: session.currency,
    })))
}
