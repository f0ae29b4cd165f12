//! Demo data seeding
//!
//! Explicit and idempotent; invoked by `main` behind the `SEED_DEMO` flag
//! or directly by tests that want fixture data. Never runs implicitly.

use rust_decimal::Decimal;
use shared::models::{SettingsUpdate, TransactionCreate};

use crate::state::AppState;

pub const DEMO_EMAIL: &str = "demo@paydeck.dev";
pub const DEMO_PASSWORD: &str = "demo123";

/// Create the demo merchant with branding and a handful of transactions.
/// Returns the merchant id; a repeat call is a no-op returning the existing
/// merchant.
pub async fn seed_demo_merchant(state: &AppState) -> Option<String> {
    if let Some(existing) = state.merchants.authenticate(DEMO_EMAIL, DEMO_PASSWORD).await {
        tracing::debug!("Demo merchant already seeded");
        return Some(existing.id);
    }

    let merchant = match state
        .merchants
        .create(DEMO_EMAIL, DEMO_PASSWORD, "Demo Business")
        .await
    {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("Demo merchant seeding skipped: {e}");
            return None;
        }
    };

    let _ = state
        .merchants
        .update_settings(
            &merchant.id,
            SettingsUpdate {
                business_name: Some("Demo Coffee Shop".to_string()),
                address: Some("123 Main Street, Lagos, Nigeria".to_string()),
                phone: Some("+234 123 456 7890".to_string()),
                primary_color: Some("#10b981".to_string()),
                secondary_color: Some("#059669".to_string()),
                receipt_footer: Some("Thanks for visiting Demo Coffee Shop!".to_string()),
                ..Default::default()
            },
        )
        .await;

    let demo_txns = [
        (Decimal::new(1500, 0), "NGN", "demo_1"),
        (Decimal::new(2500, 0), "NGN", "demo_2"),
        (Decimal::new(50, 0), "USD", "demo_3"),
        (Decimal::new(3000, 0), "NGN", "demo_4"),
    ];
    for (amount, currency, reference) in demo_txns {
        let _ = state
            .transactions
            .append(
                &merchant.id,
                TransactionCreate {
                    amount,
                    currency: currency.to_string(),
                    status: "completed".to_string(),
                    processor_reference: Some(reference.to_string()),
                    customer_phone: None,
                    customer_email: None,
                    card_summary: None,
                    location: None,
                },
            )
            .await;
    }

    tracing::info!(merchant_id = %merchant.id, "Demo merchant seeded ({DEMO_EMAIL})");
    Some(merchant.id)
}
