//! Merchant and branding settings models

use serde::{Deserialize, Serialize};

/// Linked processor account state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorStatus {
    /// No processor account linked
    #[default]
    NotConnected,
    /// Onboarding started, not yet confirmed by the processor
    Pending,
    /// Account linked and chargeable
    Connected,
}

/// Merchant entity
///
/// The password hash never leaves the ledger; API responses use
/// [`MerchantPublic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Merchant {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub business_name: String,
    pub processor_account_id: Option<String>,
    pub processor_status: ProcessorStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Merchant view without the credential field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantPublic {
    pub id: String,
    pub email: String,
    pub business_name: String,
    pub processor_account_id: Option<String>,
    pub processor_status: ProcessorStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Merchant> for MerchantPublic {
    fn from(m: &Merchant) -> Self {
        Self {
            id: m.id.clone(),
            email: m.email.clone(),
            business_name: m.business_name.clone(),
            processor_account_id: m.processor_account_id.clone(),
            processor_status: m.processor_status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Branding settings, 1:1 with a merchant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantSettings {
    pub merchant_id: String,
    pub business_name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub address: String,
    pub phone: String,
    pub business_email: String,
    pub receipt_footer: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MerchantSettings {
    /// Default branding created alongside a new merchant
    pub fn defaults(merchant_id: &str, business_name: &str, email: &str, now: i64) -> Self {
        Self {
            merchant_id: merchant_id.to_string(),
            business_name: business_name.to_string(),
            logo_url: None,
            primary_color: "#6366f1".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            address: String::new(),
            phone: String::new(),
            business_email: email.to_string(),
            receipt_footer: "Thank you for your business!".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial settings update payload; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub business_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub business_email: Option<String>,
    pub receipt_footer: Option<String>,
}
