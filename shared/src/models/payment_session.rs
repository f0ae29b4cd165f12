//! Payment session model (one checkout attempt)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment session status
///
/// `Pending → Completed` is the only transition; there is no failed state.
/// A session that never completes is dropped by the retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// Short-lived record bridging UI polling and asynchronous confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub merchant_id: Option<String>,
    pub status: PaymentStatus,
    pub processor_reference: Option<String>,
    pub created_at: i64,
    pub completed_at: Option<i64>,
    /// Originating client address, kept for fraud review
    pub ip: String,
    /// Daily-quota key the accepted charge was committed under
    pub quota_key: String,
}

impl PaymentSession {
    /// `paid` is reported only for completed sessions; everything else,
    /// including sessions the processor has failed, polls as `pending`.
    pub fn poll_status(&self) -> &'static str {
        match self.status {
            PaymentStatus::Completed => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}
