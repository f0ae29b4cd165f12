//! Saved customer model (card-on-file)

use serde::{Deserialize, Serialize};

/// Customer with a saved card, looked up by phone number scoped per merchant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub merchant_id: String,
    pub processor_customer_id: String,
    pub card_last4: String,
    pub card_brand: String,
    /// Connected account the card was saved under, if any
    pub processor_account_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
