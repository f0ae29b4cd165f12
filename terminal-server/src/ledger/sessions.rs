//! Login session store
//!
//! Maps opaque tokens to merchant ids with a fixed 7-day TTL. Expired
//! entries are evicted lazily on validation; absence and expiry both
//! collapse to "no active session".

use shared::models::Session;
use shared::util::{new_id, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const SESSION_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Issue a token for a merchant. Multiple concurrent sessions per
    /// merchant are allowed.
    pub async fn create(&self, merchant_id: &str) -> String {
        self.create_at(merchant_id, now_millis()).await
    }

    pub(crate) async fn create_at(&self, merchant_id: &str, now: i64) -> String {
        let token = new_id("sess");
        let session = Session {
            merchant_id: merchant_id.to_string(),
            created_at: now,
            expires_at: now + SESSION_TTL_MS,
        };
        self.inner.lock().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its merchant id, evicting the record when the
    /// token has reached its expiry.
    pub async fn validate(&self, token: &str) -> Option<String> {
        self.validate_at(token, now_millis()).await
    }

    pub(crate) async fn validate_at(&self, token: &str, now: i64) -> Option<String> {
        let mut map = self.inner.lock().await;
        let session = map.get(token)?;
        if now >= session.expires_at {
            let _ = map.remove(token);
            return None;
        }
        Some(session.merchant_id.clone())
    }

    /// Unconditional removal; no error when the token is absent.
    pub async fn delete(&self, token: &str) {
        let _ = self.inner.lock().await.remove(token);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
