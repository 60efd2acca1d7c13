//! End-to-end daily quota behavior over an in-memory counter store.

use lezzet_core::types::{DayKey, UserId};
use lezzet_integration_tests::MemoryCounterStore;
use lezzet_server::services::{DAILY_MESSAGE_LIMIT, UsageLedger};

fn day(s: &str) -> DayKey {
    s.parse().expect("valid day key")
}

#[tokio::test]
async fn test_tenth_message_allowed_eleventh_refused() {
    let store = MemoryCounterStore::default();
    let ledger = UsageLedger::new(&store);
    let user = UserId::from("chat-user");
    let today = day("2026-08-30");

    // Nine messages in: the tenth check still passes.
    for _ in 0..DAILY_MESSAGE_LIMIT - 1 {
        let check = ledger.check_limit(&user, &today).await;
        assert!(check.allowed);
        ledger.record_message(&user, &today).await.expect("record");
    }

    let tenth = ledger.check_limit(&user, &today).await;
    assert!(tenth.allowed);
    assert_eq!(tenth.used, DAILY_MESSAGE_LIMIT - 1);
    ledger.record_message(&user, &today).await.expect("record");

    // Quota now exhausted.
    let eleventh = ledger.check_limit(&user, &today).await;
    assert!(!eleventh.allowed);
    assert_eq!(eleventh.used, DAILY_MESSAGE_LIMIT);
    assert!(eleventh.reason.is_some());
}

#[tokio::test]
async fn test_users_have_independent_quotas() {
    let store = MemoryCounterStore::default();
    let ledger = UsageLedger::new(&store);
    let today = day("2026-08-30");

    let exhausted = UserId::from("heavy-user");
    for _ in 0..DAILY_MESSAGE_LIMIT {
        ledger
            .record_message(&exhausted, &today)
            .await
            .expect("record");
    }

    assert!(!ledger.check_limit(&exhausted, &today).await.allowed);
    assert!(
        ledger
            .check_limit(&UserId::from("fresh-user"), &today)
            .await
            .allowed
    );
}

#[tokio::test]
async fn test_next_day_starts_fresh() {
    let store = MemoryCounterStore::default();
    let ledger = UsageLedger::new(&store);
    let user = UserId::from("chat-user");

    for _ in 0..DAILY_MESSAGE_LIMIT {
        ledger
            .record_message(&user, &day("2026-08-30"))
            .await
            .expect("record");
    }

    assert!(!ledger.check_limit(&user, &day("2026-08-30")).await.allowed);

    let tomorrow = ledger.check_limit(&user, &day("2026-08-31")).await;
    assert!(tomorrow.allowed);
    assert_eq!(tomorrow.used, 0);
}

#[tokio::test]
async fn test_unreadable_store_refuses_messages() {
    let store = MemoryCounterStore {
        fail_reads: true,
        ..MemoryCounterStore::default()
    };
    let ledger = UsageLedger::new(&store);

    let check = ledger
        .check_limit(&UserId::from("chat-user"), &day("2026-08-30"))
        .await;
    assert!(!check.allowed, "a broken store must fail closed");
}

#[tokio::test]
async fn test_stats_track_recorded_messages() {
    let store = MemoryCounterStore::default();
    let ledger = UsageLedger::new(&store);
    let user = UserId::from("chat-user");
    let today = day("2026-08-30");

    for _ in 0..4 {
        ledger.record_message(&user, &today).await.expect("record");
    }

    let stats = ledger.stats(&user, &today).await.expect("stats");
    assert_eq!(stats.daily_used, 4);
    assert_eq!(stats.daily_limit, DAILY_MESSAGE_LIMIT);
    assert_eq!(stats.daily_remaining, DAILY_MESSAGE_LIMIT - 4);
}
