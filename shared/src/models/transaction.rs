//! Transaction model and dashboard query/aggregation types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Completed (or otherwise recorded) charge, append-only per merchant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub merchant_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Uppercase ISO currency code
    pub currency: String,
    pub status: String,
    pub processor_reference: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub card_summary: Option<String>,
    pub location: Option<String>,
    pub created_at: i64,
}

/// Record passed to `append`; id and timestamp are assigned by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCreate {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub processor_reference: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub card_summary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Query filters for the transaction log
///
/// Date bounds are inclusive ISO-8601 strings; a date-only `endDate` covers
/// the whole day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub currency: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of the transaction log, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub has_more: bool,
}

/// Per-currency aggregation entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyStats {
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Dashboard revenue statistics
///
/// `total_revenue` and the rolling windows blend currencies and are
/// informational only; `currency_breakdown` is the authoritative figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total_transactions: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub today_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub week_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub month_revenue: Decimal,
    pub currency_breakdown: HashMap<String, CurrencyStats>,
}
