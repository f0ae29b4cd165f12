//! Bank account model (payout destination)

use serde::{Deserialize, Serialize};

/// Payout bank account
///
/// At most one account per merchant carries `is_default = true`; the ledger
/// enforces the invariant on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub merchant_id: String,
    pub holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_number: String,
    pub account_type: String,
    pub currency: String,
    pub is_default: bool,
    pub created_at: i64,
}

/// Create payload for a bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccountCreate {
    pub holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_number: String,
    pub account_type: String,
    pub currency: String,
    #[serde(default)]
    pub is_default: bool,
}
