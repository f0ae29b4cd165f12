//! In-memory ledger stores
//!
//! Each store is a cheap cloneable handle around a single locked map,
//! constructed once in [`AppState::new`](crate::state::AppState::new) and
//! injected into handlers. No store performs I/O; processor and email calls
//! happen in the HTTP layer around them.

pub mod merchants;
pub mod payment_sessions;
pub mod seed;
pub mod sessions;
pub mod transactions;

pub use merchants::MerchantLedger;
pub use payment_sessions::PaymentSessionTracker;
pub use sessions::SessionStore;
pub use transactions::TransactionLedger;
