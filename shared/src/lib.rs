//! Shared types for the payment terminal service
//!
//! Common types used across crates: error codes and the unified API
//! response, serde data models, and id/clock utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
