//! Application state for the terminal server

use crate::config::Config;
use crate::guard::QuotaGuard;
use crate::ledger::{MerchantLedger, PaymentSessionTracker, SessionStore, TransactionLedger};

/// Shared application state
///
/// All stores are built exactly once here and handed to every component by
/// handle; nothing in the ledger is a process-global.
#[derive(Clone)]
pub struct AppState {
    /// Merchant records, settings, bank accounts, saved customers
    pub merchants: MerchantLedger,
    /// Append-only per-merchant transaction log
    pub transactions: TransactionLedger,
    /// Login session tokens
    pub sessions: SessionStore,
    /// Pending/completed checkout attempts
    pub payments: PaymentSessionTracker,
    /// Rate and daily-amount quota guard
    pub guard: QuotaGuard,
    /// Processor secret key
    pub stripe_secret_key: String,
    /// Processor webhook signing secret
    pub stripe_webhook_secret: String,
    /// URL to redirect after successful checkout
    pub checkout_success_url: String,
    /// URL to redirect after cancelled checkout
    pub checkout_cancel_url: String,
    /// Environment: development | staging | production
    pub environment: String,
}

impl AppState {
    /// Create a new AppState with empty stores
    pub fn new(config: &Config) -> Self {
        Self {
            merchants: MerchantLedger::new(),
            transactions: TransactionLedger::new(),
            sessions: SessionStore::new(),
            payments: PaymentSessionTracker::new(),
            guard: QuotaGuard::new(),
            stripe_secret_key: config.stripe_secret_key.clone(),
            stripe_webhook_secret: config.stripe_webhook_secret.clone(),
            checkout_success_url: config.checkout_success_url.clone(),
            checkout_cancel_url: config.checkout_cancel_url.clone(),
            environment: config.environment.clone(),
        }
    }

    /// Session cookies carry `Secure` everywhere except development
    pub fn secure_cookies(&self) -> bool {
        self.environment != "development"
    }
}
