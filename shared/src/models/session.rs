//! Login session model

use serde::{Deserialize, Serialize};

/// Server-side login session record
///
/// The token itself is the map key in the session store; multiple concurrent
/// sessions per merchant are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub merchant_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}
