//! Rate and amount quota guard
//!
//! Two checks keyed by client address: a sliding-window request limit and a
//! per-day cumulative amount ceiling. Both run before any mutation; a
//! rejection by either leaves every counter untouched, which is why the two
//! maps sit behind one lock and `admit` records the request timestamp only
//! after both checks pass.
//!
//! The daily total is committed separately, after the processor checkout
//! session is actually created, so a processor failure never consumes quota.
//! It is a coarse fraud deterrent, never reconciled against payment
//! completion.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Max requests per key inside the rolling window
pub const MAX_REQUESTS: usize = 10;
/// Rolling window length
pub const WINDOW_MS: i64 = 60 * 1000;

/// Per-(client, day) cumulative amount ceiling, in the reference currency
pub fn daily_limit() -> Decimal {
    Decimal::new(10_000, 0)
}

#[derive(Default)]
struct Counters {
    /// client key -> request timestamps inside the current window
    requests: HashMap<String, Vec<i64>>,
    /// "{client}-{date}" -> accepted amount total
    daily: HashMap<String, Decimal>,
}

#[derive(Clone)]
pub struct QuotaGuard {
    inner: Arc<Mutex<Counters>>,
}

impl QuotaGuard {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Counters::default())),
        }
    }

    /// Daily-quota key for a client at a given instant (local calendar day).
    pub fn quota_key(ip: &str, now: DateTime<Local>) -> String {
        format!("{ip}-{}", now.date_naive())
    }

    /// Run both checks and record the request.
    ///
    /// `amount` is the charge being attempted, or `None` for requests with
    /// no monetary effect. The daily total is NOT incremented here; call
    /// [`commit_amount`](Self::commit_amount) once the charge has actually
    /// been handed to the processor.
    pub async fn admit(&self, ip: &str, amount: Option<Decimal>) -> AppResult<()> {
        self.admit_at(ip, amount, Local::now()).await
    }

    pub(crate) async fn admit_at(
        &self,
        ip: &str,
        amount: Option<Decimal>,
        now: DateTime<Local>,
    ) -> AppResult<()> {
        let now_ms = now.timestamp_millis();
        let mut counters = self.inner.lock().await;

        let window = counters.requests.entry(ip.to_string()).or_default();
        window.retain(|&ts| now_ms - ts < WINDOW_MS);
        if window.len() >= MAX_REQUESTS {
            tracing::warn!(ip = %ip, "Rate limit exceeded");
            return Err(AppError::new(ErrorCode::RateLimited));
        }

        if let Some(amount) = amount {
            let key = Self::quota_key(ip, now);
            let spent = counters.daily.get(&key).copied().unwrap_or(Decimal::ZERO);
            if spent + amount > daily_limit() {
                tracing::warn!(ip = %ip, "Daily amount limit exceeded");
                return Err(AppError::new(ErrorCode::DailyLimitExceeded));
            }
        }

        // Both checks passed; only now does the request count against the window
        counters
            .requests
            .entry(ip.to_string())
            .or_default()
            .push(now_ms);
        Ok(())
    }

    /// Add an accepted charge to the client's daily total. Called after the
    /// processor session was created for it.
    pub async fn commit_amount(&self, quota_key: &str, amount: Decimal) {
        let mut counters = self.inner.lock().await;
        let total = counters
            .daily
            .entry(quota_key.to_string())
            .or_insert(Decimal::ZERO);
        *total += amount;
        tracing::debug!(key = %quota_key, total = %total, "Daily total updated");
    }

    /// Remove clients with no timestamps inside the window and daily keys
    /// from previous days.
    pub async fn cleanup(&self) {
        self.cleanup_at(Local::now()).await;
    }

    pub(crate) async fn cleanup_at(&self, now: DateTime<Local>) {
        let now_ms = now.timestamp_millis();
        let today_suffix = format!("-{}", now.date_naive());
        let mut counters = self.inner.lock().await;
        counters.requests.retain(|_, window| {
            window.retain(|&ts| now_ms - ts < WINDOW_MS);
            !window.is_empty()
        });
        counters.daily.retain(|key, _| key.ends_with(&today_suffix));
    }
}

impl Default for QuotaGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract client IP: X-Forwarded-For header first (reverse proxy), then peer address.
pub fn ip_from_parts(headers: &http::HeaderMap, peer: Option<std::net::SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        // X-Forwarded-For can be comma-separated; first entry is the original client
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }
    peer.map(|p| p.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn at(ms: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(ms).single().unwrap()
    }

    /// A local noon, so the calendar day is stable in every timezone
    fn noon(day: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 8, day, 12, 0, 0)
            .single()
            .unwrap()
    }

    #[tokio::test]
    async fn test_eleventh_request_in_window_rejected() {
        let guard = QuotaGuard::new();
        for i in 0..MAX_REQUESTS as i64 {
            guard.admit_at("1.2.3.4", None, at(1_000 + i)).await.unwrap();
        }
        let err = guard
            .admit_at("1.2.3.4", None, at(1_000 + 10))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RateLimited);
    }

    #[tokio::test]
    async fn test_window_slides() {
        let guard = QuotaGuard::new();
        for i in 0..MAX_REQUESTS as i64 {
            guard.admit_at("1.2.3.4", None, at(1_000 + i)).await.unwrap();
        }
        // after the window elapses, requests succeed again
        assert!(
            guard
                .admit_at("1.2.3.4", None, at(1_000 + WINDOW_MS))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let guard = QuotaGuard::new();
        for i in 0..MAX_REQUESTS as i64 {
            guard.admit_at("1.2.3.4", None, at(1_000 + i)).await.unwrap();
        }
        assert!(guard.admit_at("5.6.7.8", None, at(1_000)).await.is_ok());
    }

    #[tokio::test]
    async fn test_daily_limit_blocks_crossing_charge() {
        let guard = QuotaGuard::new();
        let now = noon(29);
        let key = QuotaGuard::quota_key("1.2.3.4", now);

        guard.admit_at("1.2.3.4", Some(dec("9000")), now).await.unwrap();
        guard.commit_amount(&key, dec("9000")).await;

        // 9000 + 1001 crosses 10,000
        let err = guard
            .admit_at("1.2.3.4", Some(dec("1001")), now)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DailyLimitExceeded);

        // exactly reaching the ceiling is allowed
        assert!(guard.admit_at("1.2.3.4", Some(dec("1000")), now).await.is_ok());
    }

    #[tokio::test]
    async fn test_uncommitted_amount_consumes_no_quota() {
        let guard = QuotaGuard::new();
        let now = noon(29);
        // admitted but never committed (processor call failed)
        guard.admit_at("1.2.3.4", Some(dec("9999")), now).await.unwrap();
        assert!(guard.admit_at("1.2.3.4", Some(dec("9999")), now).await.is_ok());
    }

    #[tokio::test]
    async fn test_daily_limit_resets_next_day() {
        let guard = QuotaGuard::new();
        let today = noon(29);
        guard
            .commit_amount(&QuotaGuard::quota_key("1.2.3.4", today), dec("10000"))
            .await;
        assert_eq!(
            guard
                .admit_at("1.2.3.4", Some(dec("1")), today)
                .await
                .unwrap_err()
                .code,
            ErrorCode::DailyLimitExceeded
        );

        let tomorrow = noon(30);
        assert!(guard.admit_at("1.2.3.4", Some(dec("1")), tomorrow).await.is_ok());
    }

    #[tokio::test]
    async fn test_daily_rejection_does_not_count_against_rate() {
        let guard = QuotaGuard::new();
        let now = noon(29);
        let key = QuotaGuard::quota_key("1.2.3.4", now);
        guard.commit_amount(&key, dec("10000")).await;

        // rejected requests must not record a window timestamp
        for _ in 0..MAX_REQUESTS * 2 {
            let _ = guard.admit_at("1.2.3.4", Some(dec("1")), now).await;
        }
        assert!(guard.admit_at("1.2.3.4", None, now).await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_drops_stale_entries() {
        let guard = QuotaGuard::new();
        let yesterday = noon(28);
        let today = noon(29);
        guard.admit_at("1.2.3.4", None, yesterday).await.unwrap();
        guard
            .commit_amount(&QuotaGuard::quota_key("1.2.3.4", yesterday), dec("5"))
            .await;

        guard.cleanup_at(today).await;
        let counters = guard.inner.lock().await;
        assert!(counters.requests.is_empty());
        assert!(counters.daily.is_empty());
    }
}
