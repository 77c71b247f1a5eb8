use super::*;
use crate::db::{ensure_schema, open_in_memory};
use crate::domain::feedback::FeedbackRecord;
use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use crate::repository::error::RepositoryError;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::thread;

fn ts(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 1)
        .unwrap()
        .and_hms_milli_opt(9, minute, 0, 250)
        .unwrap()
}

fn record(id: &str, category: RecommendationCategory, status: RecommendationStatus) -> FeedbackRecord {
    FeedbackRecord {
        feedback_id: id.to_string(),
        recommendation_id: format!("rec-{}", id),
        category,
        status,
        timestamp: ts(0),
        note: None,
    }
}

fn sqlite_repo() -> SqliteFeedbackRepository {
    let conn = open_in_memory().unwrap();
    ensure_schema(&conn).unwrap();
    SqliteFeedbackRepository::new(Arc::new(Mutex::new(conn)))
}

/// 两种实现共用的行为检查
fn check_append_and_query(repo: &dyn FeedbackRepository) {
    let mut first = record("f1", RecommendationCategory::Budget, RecommendationStatus::Accepted);
    first.timestamp = ts(1);
    first.note = Some("approved by PMO".to_string());
    repo.append(&first).unwrap();
    repo.append(&record("f2", RecommendationCategory::Risk, RecommendationStatus::Rejected))
        .unwrap();
    repo.append(&record("f3", RecommendationCategory::Budget, RecommendationStatus::Deferred))
        .unwrap();

    let budget = repo.query_by_category(RecommendationCategory::Budget).unwrap();
    assert_eq!(budget.len(), 2);
    assert_eq!(budget[0], first);
    assert_eq!(budget[1].feedback_id, "f3");
    assert_eq!(budget[1].status, RecommendationStatus::Deferred);

    assert_eq!(repo.query_by_category(RecommendationCategory::Risk).unwrap().len(), 1);
    assert!(repo
        .query_by_category(RecommendationCategory::Vendor)
        .unwrap()
        .is_empty());
}

#[test]
fn test_in_memory_append_and_query() {
    check_append_and_query(&InMemoryFeedbackRepository::new());
}

#[test]
fn test_sqlite_append_and_query() {
    check_append_and_query(&sqlite_repo());
}

#[test]
fn test_duplicate_feedback_id_rejected() {
    let memory = InMemoryFeedbackRepository::new();
    let r = record("dup", RecommendationCategory::Timeline, RecommendationStatus::Accepted);
    memory.append(&r).unwrap();
    assert!(matches!(
        memory.append(&r),
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));

    let sqlite = sqlite_repo();
    sqlite.append(&r).unwrap();
    assert!(matches!(
        sqlite.append(&r),
        Err(RepositoryError::UniqueConstraintViolation(_))
    ));
    assert_eq!(sqlite.count().unwrap(), 1);
}

#[test]
fn test_concurrent_appends_are_not_lost() {
    let repo = Arc::new(InMemoryFeedbackRepository::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..25 {
                    let id = format!("t{}-{}", t, i);
                    repo.append(&record(
                        &id,
                        RecommendationCategory::Optimization,
                        RecommendationStatus::Acknowledged,
                    ))
                    .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.len().unwrap(), 200);
    assert_eq!(
        repo.query_by_category(RecommendationCategory::Optimization)
            .unwrap()
            .len(),
        200
    );
}
