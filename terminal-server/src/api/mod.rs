//! API routes for the terminal server

pub mod auth;
pub mod bank_accounts;
pub mod health;
pub mod merchant;
pub mod payments;
pub mod settings;
pub mod transactions;
pub mod webhook;

use crate::auth::session_auth;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Handler result: JSON body or an [`AppError`] rendered as a JSON envelope
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Merchant dashboard (session-cookie authenticated)
    let dashboard = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/bank-accounts",
            get(bank_accounts::list).post(bank_accounts::create),
        )
        .route(
            "/api/bank-accounts/{id}/default",
            put(bank_accounts::set_default),
        )
        .route("/api/bank-accounts/{id}", delete(bank_accounts::remove))
        .route(
            "/api/merchant/processor-link",
            post(merchant::link_processor).delete(merchant::unlink_processor),
        )
        .route(
            "/api/transactions",
            get(transactions::list).delete(transactions::reset),
        )
        .route("/api/transactions/stats", get(transactions::stats))
        .layer(middleware::from_fn_with_state(state.clone(), session_auth));

    // Terminal payment flow (guarded in-handler, no login)
    let payments = Router::new()
        .route("/api/payments/session", post(payments::create_session))
        .route("/api/payments/save-card", post(payments::save_card))
        .route("/api/payments/saved-card", post(payments::charge_saved_card))
        .route("/api/payments/{id}/status", get(payments::session_status));

    // Auth (no middleware; logout works on any cookie state)
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    // Processor webhook (signature-verified, raw body)
    let webhook = Router::new().route("/webhook", post(webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth_routes)
        .merge(dashboard)
        .merge(payments)
        .merge(webhook)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
