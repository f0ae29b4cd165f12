//! Data models
//!
//! Shared between the terminal server and the dashboard frontend (via API).
//! All timestamps are `i64` UTC milliseconds; all money amounts are
//! `rust_decimal::Decimal` in the currency's major unit, serialized as JSON
//! floats to match the boundary contract.

pub mod bank_account;
pub mod customer;
pub mod merchant;
pub mod payment_session;
pub mod session;
pub mod transaction;

// Re-exports
pub use bank_account::*;
pub use customer::*;
pub use merchant::*;
pub use payment_session::*;
pub use session::*;
pub use transaction::*;
