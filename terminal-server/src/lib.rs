//! terminal-server — point-of-sale payment terminal backend
//!
//! In-memory ledger (merchants, transactions, sessions, payment sessions),
//! rate/quota guard, processor pass-through for hosted checkout and saved
//! cards, webhook-driven payment confirmation, and the merchant dashboard
//! API.

pub mod api;
pub mod auth;
pub mod config;
pub mod currency;
pub mod guard;
pub mod ledger;
pub mod state;
pub mod stripe;
pub mod util;
