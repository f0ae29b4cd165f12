//! Payment session tracker
//!
//! Short-lived pending→completed records bridging the numpad UI's status
//! polling and the processor's asynchronous webhook confirmation. The hourly
//! retention sweep is a memory bound, not a business rule: payment state
//! correctness never depends on it.

use rust_decimal::Decimal;
use shared::models::{PaymentSession, PaymentStatus};
use shared::util::{new_id, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Sessions older than this are dropped by the sweep regardless of status
pub const RETENTION_MS: i64 = 60 * 60 * 1000;

#[derive(Clone)]
pub struct PaymentSessionTracker {
    inner: Arc<Mutex<HashMap<String, PaymentSession>>>,
}

impl PaymentSessionTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Track a new pending checkout attempt.
    pub async fn create(
        &self,
        amount: Decimal,
        currency: &str,
        merchant_id: Option<&str>,
        ip: &str,
        quota_key: &str,
    ) -> PaymentSession {
        self.create_at(amount, currency, merchant_id, ip, quota_key, now_millis())
            .await
    }

    pub(crate) async fn create_at(
        &self,
        amount: Decimal,
        currency: &str,
        merchant_id: Option<&str>,
        ip: &str,
        quota_key: &str,
        now: i64,
    ) -> PaymentSession {
        let session = PaymentSession {
            id: new_id("pay"),
            amount,
            currency: currency.to_uppercase(),
            merchant_id: merchant_id.map(str::to_string),
            status: PaymentStatus::Pending,
            processor_reference: None,
            created_at: now,
            completed_at: None,
            ip: ip.to_string(),
            quota_key: quota_key.to_string(),
        };
        let _ = self
            .inner
            .lock()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Drop a session that was tracked but whose processor checkout failed,
    /// so a failed charge attempt is never recorded.
    pub async fn discard(&self, session_id: &str) {
        let _ = self.inner.lock().await.remove(session_id);
    }

    /// Transition a session to completed, driven by the webhook.
    ///
    /// Returns the completed record on the first transition only, so the
    /// caller appends exactly one transaction per confirmation. Unknown ids
    /// and repeated confirmations are silent no-ops.
    pub async fn mark_completed(
        &self,
        session_id: &str,
        processor_reference: &str,
    ) -> Option<PaymentSession> {
        let mut map = self.inner.lock().await;
        let session = map.get_mut(session_id)?;
        if session.status == PaymentStatus::Completed {
            return None;
        }
        session.status = PaymentStatus::Completed;
        session.processor_reference = Some(processor_reference.to_string());
        session.completed_at = Some(now_millis());
        Some(session.clone())
    }

    pub async fn get(&self, session_id: &str) -> Option<PaymentSession> {
        self.inner.lock().await.get(session_id).cloned()
    }

    /// Remove sessions past the retention window. Returns the evicted count.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(now_millis()).await
    }

    pub(crate) async fn sweep_at(&self, now: i64) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, s| now - s.created_at < RETENTION_MS);
        before - map.len()
    }
}

impl Default for PaymentSessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_created_session_polls_pending() {
        let tracker = PaymentSessionTracker::new();
        let s = tracker
            .create(dec("25"), "usd", Some("m1"), "1.2.3.4", "1.2.3.4-2026-08-29")
            .await;
        let got = tracker.get(&s.id).await.unwrap();
        assert_eq!(got.status, PaymentStatus::Pending);
        assert_eq!(got.poll_status(), "pending");
        assert_eq!(got.currency, "USD");
    }

    #[tokio::test]
    async fn test_mark_completed_once() {
        let tracker = PaymentSessionTracker::new();
        let s = tracker.create(dec("25"), "usd", None, "ip", "key").await;

        let completed = tracker.mark_completed(&s.id, "cs_123").await.unwrap();
        assert_eq!(completed.status, PaymentStatus::Completed);
        assert_eq!(completed.processor_reference.as_deref(), Some("cs_123"));
        assert_eq!(tracker.get(&s.id).await.unwrap().poll_status(), "paid");

        // second confirmation is a no-op
        assert!(tracker.mark_completed(&s.id, "cs_123").await.is_none());
    }

    #[tokio::test]
    async fn test_mark_completed_unknown_is_noop() {
        let tracker = PaymentSessionTracker::new();
        assert!(tracker.mark_completed("pay_0_missing00", "cs_1").await.is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_old_regardless_of_status() {
        let tracker = PaymentSessionTracker::new();
        let old_pending = tracker
            .create_at(dec("1"), "usd", None, "ip", "key", 0)
            .await;
        let old_paid = tracker
            .create_at(dec("2"), "usd", None, "ip", "key", 0)
            .await;
        tracker.mark_completed(&old_paid.id, "cs_1").await;
        let fresh = tracker
            .create_at(dec("3"), "usd", None, "ip", "key", RETENTION_MS)
            .await;

        let evicted = tracker.sweep_at(RETENTION_MS + 1).await;
        assert_eq!(evicted, 2);
        assert!(tracker.get(&old_pending.id).await.is_none());
        assert!(tracker.get(&old_paid.id).await.is_none());
        assert!(tracker.get(&fresh.id).await.is_some());
    }

    #[tokio::test]
    async fn test_discard() {
        let tracker = PaymentSessionTracker::new();
        let s = tracker.create(dec("1"), "usd", None, "ip", "key").await;
        tracker.discard(&s.id).await;
        assert!(tracker.get(&s.id).await.is_none());
    }
}
