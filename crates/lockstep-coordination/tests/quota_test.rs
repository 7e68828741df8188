//! Quota guard integration tests against live PostgreSQL.
//!
//! Run with `cargo test -- --ignored` and a `DATABASE_URL` pointing at a
//! disposable database.

mod common;

use uuid::Uuid;

use lockstep_coordination::quota::{QuotaDecision, QuotaGuard};
use lockstep_database::repositories::UsageCounterRepository;

fn fresh_subject() -> String {
    format!("user-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_sequential_increments_up_to_limit() {
    let pool = common::test_pool().await;
    let guard = QuotaGuard::new(UsageCounterRepository::new(pool));
    let subject = fresh_subject();

    for expected in 1..=3 {
        let decision = guard
            .check_and_increment(&subject, "export", 3)
            .await
            .unwrap();
        assert_eq!(
            decision,
            QuotaDecision::Allowed {
                current_usage: expected
            }
        );
    }

    let denied = guard
        .check_and_increment(&subject, "export", 3)
        .await
        .unwrap();
    assert_eq!(denied, QuotaDecision::Exceeded);
    assert_eq!(guard.current_usage(&subject, "export").await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_concurrent_increments_never_exceed_limit() {
    let pool = common::test_pool().await;
    let guard = QuotaGuard::new(UsageCounterRepository::new(pool));
    let subject = fresh_subject();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let g = guard.clone();
        let s = subject.clone();
        handles.push(tokio::spawn(async move {
            g.check_and_increment(&s, "export", 3).await.unwrap()
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap().is_allowed() {
            allowed += 1;
        }
    }

    assert_eq!(allowed, 3);
    assert_eq!(guard.current_usage(&subject, "export").await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_non_positive_limit_admits_nothing() {
    let pool = common::test_pool().await;
    let guard = QuotaGuard::new(UsageCounterRepository::new(pool));
    let subject = fresh_subject();

    let denied = guard
        .check_and_increment(&subject, "export", 0)
        .await
        .unwrap();
    assert_eq!(denied, QuotaDecision::Exceeded);

    // Nothing was written, not even a zeroed counter.
    assert_eq!(guard.current_usage(&subject, "export").await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_counters_are_scoped_per_feature() {
    let pool = common::test_pool().await;
    let guard = QuotaGuard::new(UsageCounterRepository::new(pool));
    let subject = fresh_subject();

    let export = guard
        .check_and_increment(&subject, "export", 1)
        .await
        .unwrap();
    assert!(export.is_allowed());

    // A different feature has its own counter and its own ceiling.
    let search = guard
        .check_and_increment(&subject, "search", 1)
        .await
        .unwrap();
    assert!(search.is_allowed());

    let denied = guard
        .check_and_increment(&subject, "export", 1)
        .await
        .unwrap();
    assert_eq!(denied, QuotaDecision::Exceeded);
}
