//! Health check endpoint

use axum::Json;
use serde_json::{Value, json};

use crate::{currency, guard};

/// GET /health — liveness plus the configured guard limits, so a terminal
/// can display them without hardcoding.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "terminal-server",
        "version": env!("CARGO_PKG_VERSION"),
        "limits": {
            "rate_window_ms": guard::WINDOW_MS,
            "rate_max_requests": guard::MAX_REQUESTS,
            "daily_amount_limit": guard::daily_limit(),
            "default_minimum_amount": currency::default_minimum(),
            "maximum_amount": currency::max_amount(),
        },
    }))
}
