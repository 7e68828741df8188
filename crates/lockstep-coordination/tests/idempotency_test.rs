//! Idempotency store integration tests against the in-memory provider.

mod common;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lockstep_coordination::idempotency::IdempotencyStore;
use lockstep_core::config::coordination::IdempotencyConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookingReceipt {
    booking_id: String,
    amount_cents: i64,
}

fn store() -> IdempotencyStore {
    IdempotencyStore::new(common::memory_cache(), &IdempotencyConfig::default())
}

#[tokio::test]
async fn test_fetch_absent_returns_none() {
    let store = store();
    let result: Option<BookingReceipt> = store.fetch("req-unknown").await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_replay_returns_first_result() {
    let store = store();
    let receipt = BookingReceipt {
        booking_id: "bk-100".to_string(),
        amount_cents: 4_500,
    };

    assert!(store.store("req-1", &receipt).await.unwrap());

    let first: Option<BookingReceipt> = store.fetch("req-1").await.unwrap();
    let second: Option<BookingReceipt> = store.fetch("req-1").await.unwrap();
    assert_eq!(first, Some(receipt.clone()));
    assert_eq!(second, Some(receipt));
}

#[tokio::test]
async fn test_first_recorded_result_is_authoritative() {
    let store = store();
    let original = BookingReceipt {
        booking_id: "bk-200".to_string(),
        amount_cents: 1_000,
    };
    let duplicate = BookingReceipt {
        booking_id: "bk-201".to_string(),
        amount_cents: 9_999,
    };

    assert!(store.store("req-2", &original).await.unwrap());
    assert!(!store.store("req-2", &duplicate).await.unwrap());

    let stored: Option<BookingReceipt> = store.fetch("req-2").await.unwrap();
    assert_eq!(stored, Some(original));
}

#[tokio::test]
async fn test_record_expires_after_ttl() {
    let store = IdempotencyStore::new(
        common::memory_cache(),
        &IdempotencyConfig { ttl_seconds: 1 },
    );
    let receipt = BookingReceipt {
        booking_id: "bk-300".to_string(),
        amount_cents: 2_500,
    };

    store.store("req-3", &receipt).await.unwrap();
    let present: Option<BookingReceipt> = store.fetch("req-3").await.unwrap();
    assert!(present.is_some());

    tokio::time::sleep(Duration::from_millis(1_200)).await;

    let expired: Option<BookingReceipt> = store.fetch("req-3").await.unwrap();
    assert_eq!(expired, None);
}
