//! Transaction ledger
//!
//! Append-only per-merchant transaction log with query and aggregation.
//! Records are immutable once appended; `clear` wipes a merchant's entire
//! log for the dashboard "reset" action.

use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use shared::models::{
    CurrencyStats, Transaction, TransactionCreate, TransactionPage, TransactionQuery,
    TransactionStats,
};
use shared::util::{new_id, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_LIMIT: usize = 50;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone)]
pub struct TransactionLedger {
    inner: Arc<RwLock<HashMap<String, Vec<Transaction>>>>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append a record, assigning id and timestamp. No validation beyond the
    /// merchant id; the HTTP layer is responsible for amount checks.
    pub async fn append(&self, merchant_id: &str, record: TransactionCreate) -> Transaction {
        self.append_at(merchant_id, record, now_millis()).await
    }

    pub(crate) async fn append_at(
        &self,
        merchant_id: &str,
        record: TransactionCreate,
        now: i64,
    ) -> Transaction {
        let txn = Transaction {
            id: new_id("txn"),
            merchant_id: merchant_id.to_string(),
            amount: record.amount,
            currency: record.currency.to_uppercase(),
            status: record.status,
            processor_reference: record.processor_reference,
            customer_phone: record.customer_phone,
            customer_email: record.customer_email,
            card_summary: record.card_summary,
            location: record.location,
            created_at: now,
        };
        self.inner
            .write()
            .await
            .entry(merchant_id.to_string())
            .or_default()
            .push(txn.clone());
        txn
    }

    /// Query the log newest-first with inclusive date bounds, exact currency
    /// match and offset/limit pagination.
    pub async fn query(
        &self,
        merchant_id: &str,
        query: &TransactionQuery,
    ) -> AppResult<TransactionPage> {
        let start = query
            .start_date
            .as_deref()
            .map(|s| parse_bound(s, false))
            .transpose()?;
        let end = query
            .end_date
            .as_deref()
            .map(|s| parse_bound(s, true))
            .transpose()?;
        let currency = query.currency.as_ref().map(|c| c.to_uppercase());

        let map = self.inner.read().await;
        let mut matched: Vec<Transaction> = map
            .get(merchant_id)
            .map(|txns| {
                txns.iter()
                    .filter(|t| start.is_none_or(|s| t.created_at >= s))
                    .filter(|t| end.is_none_or(|e| t.created_at <= e))
                    .filter(|t| currency.as_deref().is_none_or(|c| t.currency == c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = query.offset.unwrap_or(0);
        let total = matched.len();
        let transactions: Vec<Transaction> =
            matched.into_iter().skip(offset).take(limit).collect();

        Ok(TransactionPage {
            transactions,
            total,
            has_more: total > offset + limit,
        })
    }

    /// Dashboard revenue statistics.
    ///
    /// "Today" starts at local midnight; the week/month windows trail the
    /// current instant by 7 and 30 days. The blended revenue figures sum
    /// across currencies and are informational only; `currency_breakdown`
    /// is the authoritative number.
    pub async fn stats(&self, merchant_id: &str) -> TransactionStats {
        self.stats_at(merchant_id, chrono::Local::now()).await
    }

    pub(crate) async fn stats_at<Tz: TimeZone>(
        &self,
        merchant_id: &str,
        now: DateTime<Tz>,
    ) -> TransactionStats {
        let now_ms = now.timestamp_millis();
        let today_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
            .map_or(now_ms, |dt| dt.timestamp_millis());
        let week_start = now_ms - 7 * DAY_MS;
        let month_start = now_ms - 30 * DAY_MS;

        let map = self.inner.read().await;
        let mut stats = TransactionStats {
            total_transactions: 0,
            total_revenue: Decimal::ZERO,
            today_revenue: Decimal::ZERO,
            week_revenue: Decimal::ZERO,
            month_revenue: Decimal::ZERO,
            currency_breakdown: HashMap::new(),
        };

        for txn in map.get(merchant_id).into_iter().flatten() {
            stats.total_transactions += 1;
            stats.total_revenue += txn.amount;
            if txn.created_at >= today_start {
                stats.today_revenue += txn.amount;
            }
            if txn.created_at >= week_start {
                stats.week_revenue += txn.amount;
            }
            if txn.created_at >= month_start {
                stats.month_revenue += txn.amount;
            }
            let entry = stats
                .currency_breakdown
                .entry(txn.currency.clone())
                .or_insert_with(CurrencyStats::default);
            entry.count += 1;
            entry.total += txn.amount;
        }
        stats
    }

    /// Remove all records for the merchant. Irreversible.
    pub async fn clear(&self, merchant_id: &str) {
        let _ = self.inner.write().await.remove(merchant_id);
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an inclusive ISO-8601 query bound to UTC milliseconds.
///
/// Accepts a full RFC 3339 datetime or a bare date; a date-only end bound
/// covers the entire day.
fn parse_bound(s: &str, end: bool) -> AppResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date: {s}")))?;
    let naive = if end {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    naive
        .map(|n| n.and_utc().timestamp_millis())
        .ok_or_else(|| AppError::validation(format!("Invalid date: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record(amount: &str, currency: &str) -> TransactionCreate {
        TransactionCreate {
            amount: dec(amount),
            currency: currency.to_string(),
            status: "completed".to_string(),
            processor_reference: Some("cs_test".to_string()),
            customer_phone: None,
            customer_email: None,
            card_summary: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_append_query_round_trip() {
        let ledger = TransactionLedger::new();
        let appended = ledger.append("m1", record("12.50", "usd")).await;
        assert_eq!(appended.currency, "USD");

        let page = ledger
            .query("m1", &TransactionQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(!page.has_more);
        let got = &page.transactions[0];
        assert_eq!(got.id, appended.id);
        assert_eq!(got.amount, dec("12.50"));
        assert_eq!(got.processor_reference.as_deref(), Some("cs_test"));
    }

    #[tokio::test]
    async fn test_query_sorted_newest_first() {
        let ledger = TransactionLedger::new();
        ledger.append_at("m1", record("1", "usd"), 1_000).await;
        ledger.append_at("m1", record("3", "usd"), 3_000).await;
        ledger.append_at("m1", record("2", "usd"), 2_000).await;

        let page = ledger
            .query("m1", &TransactionQuery::default())
            .await
            .unwrap();
        let amounts: Vec<Decimal> = page.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec("3"), dec("2"), dec("1")]);
    }

    #[tokio::test]
    async fn test_pagination_and_has_more() {
        let ledger = TransactionLedger::new();
        for i in 0..5 {
            ledger
                .append_at("m1", record("1", "usd"), 1_000 + i)
                .await;
        }
        let page = ledger
            .query(
                "m1",
                &TransactionQuery {
                    limit: Some(2),
                    offset: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.total, 5);
        assert!(page.has_more); // 5 > 2 + 2

        let last = ledger
            .query(
                "m1",
                &TransactionQuery {
                    limit: Some(2),
                    offset: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(last.transactions.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_currency_filter_exact_match() {
        let ledger = TransactionLedger::new();
        ledger.append("m1", record("10", "usd")).await;
        ledger.append("m1", record("500", "ngn")).await;

        let page = ledger
            .query(
                "m1",
                &TransactionQuery {
                    currency: Some("usd".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_date_bounds_inclusive() {
        let ledger = TransactionLedger::new();
        let jan1 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let jan2 = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();
        let jan3 = Utc.with_ymd_and_hms(2026, 1, 3, 12, 0, 0).unwrap();
        for (rec, at) in [("1", jan1), ("2", jan2), ("3", jan3)] {
            ledger
                .append_at("m1", record(rec, "usd"), at.timestamp_millis())
                .await;
        }

        let page = ledger
            .query(
                "m1",
                &TransactionQuery {
                    start_date: Some("2026-01-02".to_string()),
                    end_date: Some("2026-01-02".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // date-only end bound covers the whole day
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].amount, dec("2"));
    }

    #[tokio::test]
    async fn test_malformed_date_rejected() {
        let ledger = TransactionLedger::new();
        let err = ledger
            .query(
                "m1",
                &TransactionQuery {
                    start_date: Some("yesterday".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_stats_windows() {
        let ledger = TransactionLedger::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        let now_ms = now.timestamp_millis();

        // today, 3 days ago, 40 days ago
        ledger.append_at("m1", record("10", "usd"), now_ms - 3600_000).await;
        ledger
            .append_at("m1", record("20", "usd"), now_ms - 3 * DAY_MS)
            .await;
        ledger
            .append_at("m1", record("30", "usd"), now_ms - 40 * DAY_MS)
            .await;

        let stats = ledger.stats_at("m1", now).await;
        assert_eq!(stats.total_transactions, 3);
        assert_eq!(stats.total_revenue, dec("60"));
        assert_eq!(stats.today_revenue, dec("10"));
        assert_eq!(stats.week_revenue, dec("30"));
        assert_eq!(stats.month_revenue, dec("30"));
        let usd = &stats.currency_breakdown["USD"];
        assert_eq!(usd.count, 3);
        assert_eq!(usd.total, dec("60"));
    }

    #[tokio::test]
    async fn test_stats_currency_breakdown() {
        let ledger = TransactionLedger::new();
        ledger.append("m1", record("1500", "ngn")).await;
        ledger.append("m1", record("2500", "ngn")).await;
        ledger.append("m1", record("50", "usd")).await;

        let stats = ledger.stats("m1").await;
        assert_eq!(stats.currency_breakdown["NGN"].count, 2);
        assert_eq!(stats.currency_breakdown["NGN"].total, dec("4000"));
        assert_eq!(stats.currency_breakdown["USD"].count, 1);
        // blended figure is informational only
        assert_eq!(stats.total_revenue, dec("4050"));
    }

    #[tokio::test]
    async fn test_clear() {
        let ledger = TransactionLedger::new();
        ledger.append("m1", record("10", "usd")).await;
        ledger.clear("m1").await;
        let page = ledger
            .query("m1", &TransactionQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        let stats = ledger.stats("m1").await;
        assert_eq!(stats.total_transactions, 0);
    }
}
