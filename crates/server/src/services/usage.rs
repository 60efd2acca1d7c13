//! Daily chat usage limiting.
//!
//! Each user gets a flat quota of messages per UTC day. Counts live in an
//! external counter store keyed by (user, day); the ledger only decides
//! and records, so it can be tested against an in-memory store.

use lezzet_core::types::{DayKey, UserId};
use serde::Serialize;

use crate::db::RepositoryError;

/// Flat per-user daily message quota.
pub const DAILY_MESSAGE_LIMIT: u64 = 10;

/// A per-(user, day) message counter.
///
/// Counts are monotonically non-decreasing within a day and are never
/// read across days.
pub trait CounterStore {
    /// Messages the user has sent on the given day.
    fn daily_count(
        &self,
        user: &UserId,
        day: &DayKey,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Atomically add one to the user's count for the given day.
    fn increment_daily(
        &self,
        user: &UserId,
        day: &DayKey,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Result of a quota check.
#[derive(Debug, Clone, Serialize)]
pub struct LimitCheck {
    pub allowed: bool,
    pub used: u64,
    pub limit: u64,
    /// Human-readable refusal reason, set when `allowed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Current usage statistics for a user.
#[derive(Debug, Clone, Serialize)]
pub struct UsageStats {
    pub daily_used: u64,
    pub daily_limit: u64,
    pub daily_remaining: u64,
}

/// Quota decisions over a borrowed counter store.
pub struct UsageLedger<'a, S> {
    store: &'a S,
}

impl<'a, S: CounterStore> UsageLedger<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Check whether the user may send another message today.
    ///
    /// Fails closed: if the store cannot be read, the message is refused
    /// rather than risking an unmetered send.
    pub async fn check_limit(&self, user: &UserId, day: &DayKey) -> LimitCheck {
        match self.store.daily_count(user, day).await {
            Ok(used) if used >= DAILY_MESSAGE_LIMIT => LimitCheck {
                allowed: false,
                used,
                limit: DAILY_MESSAGE_LIMIT,
                reason: Some(format!(
                    "Günlük mesaj limitiniz doldu ({DAILY_MESSAGE_LIMIT} mesaj)"
                )),
            },
            Ok(used) => LimitCheck {
                allowed: true,
                used,
                limit: DAILY_MESSAGE_LIMIT,
                reason: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "usage counter read failed, refusing message");
                LimitCheck {
                    allowed: false,
                    used: 0,
                    limit: DAILY_MESSAGE_LIMIT,
                    reason: Some("Limit kontrolü yapılamadı".to_string()),
                }
            }
        }
    }

    /// Record one accepted message. Call only after the AI reply succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store rejects the increment.
    pub async fn record_message(&self, user: &UserId, day: &DayKey) -> Result<(), RepositoryError> {
        self.store.increment_daily(user, day).await
    }

    /// Current usage statistics for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store cannot be read.
    pub async fn stats(&self, user: &UserId, day: &DayKey) -> Result<UsageStats, RepositoryError> {
        let used = self.store.daily_count(user, day).await?;
        Ok(UsageStats {
            daily_used: used,
            daily_limit: DAILY_MESSAGE_LIMIT,
            daily_remaining: DAILY_MESSAGE_LIMIT.saturating_sub(used),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryCounters {
        counts: Mutex<HashMap<(String, String), u64>>,
        fail_reads: bool,
    }

    impl CounterStore for MemoryCounters {
        async fn daily_count(&self, user: &UserId, day: &DayKey) -> Result<u64, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable(
                    "counter store offline".to_string(),
                ));
            }
            let counts = self.counts.lock().expect("lock");
            Ok(*counts
                .get(&(user.to_string(), day.to_string()))
                .unwrap_or(&0))
        }

        async fn increment_daily(&self, user: &UserId, day: &DayKey) -> Result<(), RepositoryError> {
            let mut counts = self.counts.lock().expect("lock");
            *counts
                .entry((user.to_string(), day.to_string()))
                .or_insert(0) += 1;
            Ok(())
        }
    }

    fn day(s: &str) -> DayKey {
        s.parse().expect("valid day key")
    }

    #[tokio::test]
    async fn test_fresh_pair_is_allowed_with_zero_used() {
        let store = MemoryCounters::default();
        let ledger = UsageLedger::new(&store);
        let check = ledger
            .check_limit(&UserId::from("u1"), &day("2026-08-30"))
            .await;
        assert!(check.allowed);
        assert_eq!(check.used, 0);
        assert_eq!(check.limit, DAILY_MESSAGE_LIMIT);
    }

    #[tokio::test]
    async fn test_quota_exhausts_at_limit() {
        let store = MemoryCounters::default();
        let ledger = UsageLedger::new(&store);
        let user = UserId::from("u1");
        let today = day("2026-08-30");

        for _ in 0..DAILY_MESSAGE_LIMIT {
            assert!(ledger.check_limit(&user, &today).await.allowed);
            ledger.record_message(&user, &today).await.expect("record");
        }

        let check = ledger.check_limit(&user, &today).await;
        assert!(!check.allowed);
        assert_eq!(check.used, DAILY_MESSAGE_LIMIT);
        assert!(check.reason.expect("reason").contains("Günlük"));
    }

    #[tokio::test]
    async fn test_day_rollover_resets_quota() {
        let store = MemoryCounters::default();
        let ledger = UsageLedger::new(&store);
        let user = UserId::from("u1");

        for _ in 0..DAILY_MESSAGE_LIMIT {
            ledger
                .record_message(&user, &day("2026-08-30"))
                .await
                .expect("record");
        }

        assert!(!ledger.check_limit(&user, &day("2026-08-30")).await.allowed);
        assert!(ledger.check_limit(&user, &day("2026-08-31")).await.allowed);
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let store = MemoryCounters {
            fail_reads: true,
            ..MemoryCounters::default()
        };
        let ledger = UsageLedger::new(&store);
        let check = ledger
            .check_limit(&UserId::from("u1"), &day("2026-08-30"))
            .await;
        assert!(!check.allowed);
        assert!(check.reason.is_some());
    }

    #[tokio::test]
    async fn test_stats_report_remaining() {
        let store = MemoryCounters::default();
        let ledger = UsageLedger::new(&store);
        let user = UserId::from("u1");
        let today = day("2026-08-30");

        for _ in 0..3 {
            ledger.record_message(&user, &today).await.expect("record");
        }

        let stats = ledger.stats(&user, &today).await.expect("stats");
        assert_eq!(stats.daily_used, 3);
        assert_eq!(stats.daily_remaining, DAILY_MESSAGE_LIMIT - 3);
    }
}
