//! Processor webhook handler
//!
//! POST /webhook — raw body for HMAC signature verification.
//! `checkout.session.completed` carries our payment session id as
//! `client_reference_id`; the first confirmation flips the session to
//! completed and appends the merchant transaction. Repeats are no-ops, so
//! processor redelivery cannot double-record.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use shared::models::TransactionCreate;

use crate::state::AppState;
use crate::stripe;

pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let sig_header = match headers.get("stripe-signature").and_then(|v| v.to_str().ok()) {
        Some(s) => s,
        None => {
            tracing::warn!("Missing Stripe-Signature header");
            return StatusCode::BAD_REQUEST;
        }
    };

    if let Err(e) =
        stripe::verify_webhook_signature(&body, sig_header, &state.stripe_webhook_secret)
    {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event_type = event["type"].as_str().unwrap_or("");
    tracing::info!(event_type = event_type, "Received processor webhook");

    match event_type {
        "checkout.session.completed" => handle_checkout_completed(&state, &event).await,
        _ => {
            tracing::debug!(event_type = event_type, "Unhandled webhook event type");
            StatusCode::OK
        }
    }
}

async fn handle_checkout_completed(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let object = &event["data"]["object"];
    let Some(session_id) = object["client_reference_id"].as_str() else {
        tracing::warn!("checkout.session.completed without client_reference_id");
        return StatusCode::OK;
    };
    let processor_reference = object["id"].as_str().unwrap_or("");

    // First confirmation only; unknown ids and redeliveries fall through
    let Some(session) = state
        .payments
        .mark_completed(session_id, processor_reference)
        .await
    else {
        tracing::debug!(session_id = session_id, "Confirmation ignored (unknown or repeated)");
        return StatusCode::OK;
    };

    if let Some(merchant_id) = &session.merchant_id {
        let txn = state
            .transactions
            .append(
                merchant_id,
                TransactionCreate {
                    amount: session.amount,
                    currency: session.currency.clone(),
                    status: "completed".to_string(),
                    processor_reference: session.processor_reference.clone(),
                    customer_phone: None,
                    customer_email: object["customer_details"]["email"]
                        .as_str()
                        .map(String::from),
                    card_summary: None,
                    location: None,
                },
            )
            .await;
        tracing::info!(
            transaction_id = %txn.id,
            merchant_id = %merchant_id,
            amount = %session.amount,
            "Payment confirmed"
        );
    } else {
        tracing::info!(session_id = session_id, "Payment confirmed (no merchant attribution)");
    }

    StatusCode::OK
}
