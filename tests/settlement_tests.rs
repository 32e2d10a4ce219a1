mod common;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use pronos::db::PronoStore;
use pronos::errors::AppError;
use pronos::models::{Prono, PronoStatus};
use pronos::services::{settle_prono, ResultReport};

use common::{at, seed_prono, MemoryStore};

fn report(
    id: i64,
    status: Option<&str>,
    home: serde_json::Value,
    away: serde_json::Value,
) -> ResultReport {
    ResultReport {
        id,
        status: status.map(str::to_string),
        home_score: Some(home),
        away_score: Some(away),
    }
}

/// Seed a prono at even odds kicking off on 2025-11-21 20:00 UTC.
async fn seed(store: &MemoryStore, market: &str, status: PronoStatus) -> Prono {
    seed_prono(store, market, status, Decimal::TWO, at(2025, 11, 21, 20)).await
}

fn after_match() -> DateTime<Utc> {
    at(2025, 11, 22, 0)
}

#[tokio::test]
async fn test_over_under_graded_from_scores() {
    let store = MemoryStore::new();
    let kickoff = at(2025, 11, 21, 20);
    let odds = Decimal::new(185, 2);
    let prono = seed_prono(&store, "over_2_5", PronoStatus::Pending, odds, kickoff).await;

    let view = settle_prono(&store, &report(prono.id, None, json!(2), json!(1)), after_match())
        .await
        .expect("Update should succeed");

    assert_eq!(view.prono.status, PronoStatus::Won);
    assert_eq!(view.prono.home_score, Some(2));
    assert_eq!(view.prono.away_score, Some(1));
    assert!(view.state.is_finished);
    assert!(view.state.is_validated);
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_btts_graded_lost_when_one_side_blank() {
    let store = MemoryStore::new();
    let prono = seed(&store, "btts", PronoStatus::Pending).await;

    let view = settle_prono(&store, &report(prono.id, None, json!(1), json!(0)), after_match())
        .await
        .unwrap();

    assert_eq!(view.prono.status, PronoStatus::Lost);
}

#[tokio::test]
async fn test_unknown_id_is_not_found_without_writes() {
    let store = MemoryStore::new();
    let unknown = report(42, Some("won"), json!(1), json!(0));

    let result = settle_prono(&store, &unknown, after_match()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_invalid_status_rejected_before_store_access() {
    let store = MemoryStore::new();
    let prono = seed(&store, "btts", PronoStatus::Pending).await;
    let refunded = report(prono.id, Some("refunded"), json!(2), json!(2));

    let result = settle_prono(&store, &refunded, after_match()).await;

    assert!(matches!(result, Err(AppError::InvalidStatus(_))));
    assert_eq!(store.reads(), 0);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_explicit_status_overrides_settled_prono() {
    let store = MemoryStore::new();
    let prono = seed(&store, "over_2_5", PronoStatus::Won).await;
    let void = report(prono.id, Some("void"), json!(4), json!(0));

    let view = settle_prono(&store, &void, after_match()).await.unwrap();

    assert_eq!(view.prono.status, PronoStatus::Void);
}

#[tokio::test]
async fn test_settled_prono_not_regraded_by_scores() {
    let store = MemoryStore::new();
    let prono = seed(&store, "over_2_5", PronoStatus::Lost).await;

    let view = settle_prono(&store, &report(prono.id, None, json!(3), json!(3)), after_match())
        .await
        .unwrap();

    assert_eq!(view.prono.status, PronoStatus::Lost);
    assert_eq!(view.prono.home_score, Some(3));
}

#[tokio::test]
async fn test_correct_score_selection_naming_hannover_stays_pending() {
    let store = MemoryStore::new();
    let kickoff = at(2025, 11, 21, 20);
    let mut new = common::new_prono("correct_score", "Hannover 1-0", Decimal::TWO, kickoff);
    new.match_label = "Hannover 96 - Hamburger SV".into();
    let prono = store.insert(&new).await.unwrap();

    let view = settle_prono(&store, &report(prono.id, None, json!(1), json!(0)), after_match())
        .await
        .unwrap();

    assert_eq!(view.prono.status, PronoStatus::Pending);
    assert_eq!(view.prono.final_score(), Some((1, 0)));
}

#[tokio::test]
async fn test_partial_scores_merge_with_stored_ones() {
    let store = MemoryStore::new();
    let prono = seed(&store, "over_1_5", PronoStatus::Pending).await;
    let now = after_match();

    // home only: nothing to grade yet
    let view = settle_prono(
        &store,
        &ResultReport {
            id: prono.id,
            home_score: Some(json!(1)),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap();
    assert_eq!(view.prono.status, PronoStatus::Pending);
    assert_eq!(view.prono.home_score, Some(1));
    assert_eq!(view.prono.away_score, None);

    // away arrives later and completes the pair
    let view = settle_prono(
        &store,
        &ResultReport {
            id: prono.id,
            away_score: Some(json!("1")),
            ..Default::default()
        },
        now,
    )
    .await
    .unwrap();
    assert_eq!(view.prono.status, PronoStatus::Won);
    assert_eq!(view.prono.final_score(), Some((1, 1)));
}

#[tokio::test]
async fn test_malformed_score_is_treated_as_absent() {
    let store = MemoryStore::new();
    let prono = seed(&store, "btts", PronoStatus::Pending).await;
    let garbled = report(prono.id, None, json!("deux"), json!(1));

    let view = settle_prono(&store, &garbled, after_match()).await.unwrap();

    assert_eq!(view.prono.status, PronoStatus::Pending);
    assert_eq!(view.prono.home_score, None);
    assert_eq!(view.prono.away_score, Some(1));
}

#[tokio::test]
async fn test_repeated_report_is_idempotent() {
    let store = MemoryStore::new();
    let prono = seed(&store, "over_2_5", PronoStatus::Pending).await;
    let now = after_match();
    let same = report(prono.id, None, json!(1), json!(1));

    let first = settle_prono(&store, &same, now).await.unwrap();
    let second = settle_prono(&store, &same, now).await.unwrap();

    assert_eq!(first.prono.status, PronoStatus::Lost);
    assert_eq!(second.prono, first.prono);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_internal() {
    let store = MemoryStore::new();
    let prono = seed(&store, "btts", PronoStatus::Pending).await;
    store.fail_all();
    let level = report(prono.id, None, json!(1), json!(1));

    let result = settle_prono(&store, &level, after_match()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}
