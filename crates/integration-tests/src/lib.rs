//! Integration tests for the Lezzet backend.
//!
//! These tests exercise the server crate as a library without network
//! access: the usage ledger runs over an in-memory counter store, and
//! role/ownership/parsing logic is driven directly.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lezzet-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use lezzet_core::types::{DayKey, UserId};
use lezzet_server::db::RepositoryError;
use lezzet_server::services::CounterStore;

/// In-memory counter store standing in for the document-store counters.
#[derive(Default)]
pub struct MemoryCounterStore {
    pub counts: Mutex<HashMap<(String, String), u64>>,
    pub fail_reads: bool,
}

impl CounterStore for MemoryCounterStore {
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
