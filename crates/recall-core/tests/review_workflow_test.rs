//! Integration tests for the vocabulary review workflow.
//!
//! Every scenario runs against both the in-memory and the SQLite store,
//! with a manual clock so due dates are deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use recall_core::{
    CardStore, Clock, EngineConfig, ErrorCode, InMemoryCardStore, LearningStatus, ManualClock,
    QualityPolicy, SchedulerConfig, SqliteCardStore, VocabularyCard, VocabularyEngine,
    VocabularyQuery, VocabularyStats, WriteMode,
};
use std::sync::Arc;
use tempfile::TempDir;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

/// A store plus whatever must outlive it.
struct Fixture {
    store: Arc<dyn CardStore>,
    clock: Arc<ManualClock>,
    _dir: Option<TempDir>,
}

impl Fixture {
    fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryCardStore::new()),
            clock: Arc::new(ManualClock::new(start())),
            _dir: None,
        }
    }

    fn sqlite() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCardStore::new(dir.path().join("vocabulary.db")).unwrap();
        Self {
            store: Arc::new(store),
            clock: Arc::new(ManualClock::new(start())),
            _dir: Some(dir),
        }
    }

    fn engine(&self, config: EngineConfig) -> VocabularyEngine {
        VocabularyEngine::new(self.store.clone(), self.clock.clone(), config).unwrap()
    }
}

async fn review_progression(fx: Fixture) {
    let engine = fx.engine(EngineConfig::default());
    let card = engine.add_word("alice", "hund").await.unwrap();

    // A freshly added card is due immediately.
    let due = engine.list_due("alice", None).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, card.id);

    let first = engine.submit_review("alice", card.id, 5).await.unwrap();
    assert_eq!(first.new_status, LearningStatus::Learning);
    assert_eq!(first.interval_days, 1);
    assert_eq!(first.repetition_number, 1);
    assert!((first.ease_factor - 2.6).abs() < 1e-9);
    assert_eq!(first.next_review, start() + Duration::days(1));
    assert!(engine.list_due("alice", None).await.unwrap().is_empty());

    fx.clock.advance(Duration::days(1));
    let second = engine.submit_review("alice", card.id, 5).await.unwrap();
    assert_eq!(second.interval_days, 6);
    assert_eq!(second.repetition_number, 2);
    assert!((second.ease_factor - 2.7).abs() < 1e-9);

    fx.clock.advance(Duration::days(6));
    let third = engine.submit_review("alice", card.id, 4).await.unwrap();
    // 6 * 2.7 = 16.2
    assert_eq!(third.interval_days, 16);
    assert_eq!(third.new_status, LearningStatus::Familiar);

    fx.clock.advance(Duration::days(16));
    let lapse = engine.submit_review("alice", card.id, 2).await.unwrap();
    assert_eq!(lapse.new_status, LearningStatus::ReviewNeeded);
    assert_eq!(lapse.interval_days, 1);
    assert_eq!(lapse.repetition_number, 0);
    assert!((lapse.ease_factor - 2.38).abs() < 1e-9);

    let stored = engine.get_card("alice", card.id).await.unwrap();
    assert_eq!(stored.times_seen, 4);
    assert_eq!(stored.times_correct, 3);
    assert_eq!(stored.times_incorrect, 1);
    assert_eq!(stored.version, 4);
    assert_eq!(stored.last_reviewed, Some(fx.clock.now()));
    assert_eq!(stored.next_review, Some(fx.clock.now() + Duration::days(1)));
    assert!(stored.retention_score() > 0.0);
}

#[tokio::test]
async fn test_review_progression_in_memory() {
    review_progression(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_review_progression_sqlite() {
    review_progression(Fixture::sqlite()).await;
}

/// 10 cards: 3 New, 2 Learning, 1 Familiar, 4 Mastered; 5 currently due.
async fn stats_breakdown(fx: Fixture) {
    let config = SchedulerConfig::default();
    let now = start();
    let past = now - Duration::days(2);
    let future = now + Duration::days(3);

    let mut cards = Vec::new();
    for i in 0..3 {
        cards.push(VocabularyCard::new("alice", format!("new-{}", i), &config, now));
    }
    for i in 0..2 {
        cards.push(
            VocabularyCard::new("alice", format!("learning-{}", i), &config, now)
                .with_status(LearningStatus::Learning)
                .with_next_review(past),
        );
    }
    cards.push(
        VocabularyCard::new("alice", "familiar-0", &config, now)
            .with_status(LearningStatus::Familiar)
            .with_next_review(future),
    );
    for i in 0..4 {
        cards.push(
            VocabularyCard::new("alice", format!("mastered-{}", i), &config, now)
                .with_status(LearningStatus::Mastered)
                .with_next_review(future),
        );
    }
    // Another learner's cards never leak into the summary.
    cards.push(VocabularyCard::new("bob", "new-0", &config, now));

    for card in &cards {
        fx.store.insert(card).await.unwrap();
    }

    let engine = fx.engine(EngineConfig::default());
    let stats = engine.get_stats("alice").await.unwrap();
    assert_eq!(stats.total, 10);
    assert_eq!(stats.new, 3);
    assert_eq!(stats.learning, 2);
    assert_eq!(stats.familiar, 1);
    assert_eq!(stats.mastered, 4);
    assert_eq!(stats.review_needed, 0);
    assert_eq!(stats.due_for_review, 5);

    // Dated cards come first, never-scheduled cards last.
    let due = engine.list_due("alice", None).await.unwrap();
    assert_eq!(due.len(), 5);
    assert!(due[..2].iter().all(|c| c.next_review == Some(past)));
    assert!(due[2..].iter().all(|c| c.next_review.is_none()));

    let limited = engine.list_due("alice", Some(3)).await.unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(limited[2].status, LearningStatus::New);

    // Without reviews, stats only move when the clock crosses a next_review.
    assert_eq!(engine.get_stats("alice").await.unwrap(), stats);
    fx.clock.advance(Duration::days(1));
    assert_eq!(engine.get_stats("alice").await.unwrap(), stats);
    fx.clock.advance(Duration::days(2) - Duration::seconds(1));
    assert_eq!(engine.get_stats("alice").await.unwrap(), stats);

    fx.clock.advance(Duration::seconds(1));
    let crossed = engine.get_stats("alice").await.unwrap();
    assert_eq!(crossed.due_for_review, 10);
    assert_eq!(
        VocabularyStats {
            due_for_review: 5,
            ..crossed.clone()
        },
        stats
    );
    assert_eq!(engine.get_stats("alice").await.unwrap(), crossed);
}

async fn long_perfect_streak(fx: Fixture) {
    let engine = fx.engine(EngineConfig::default());
    let card = engine.add_word("alice", "hund").await.unwrap();

    // Reviews are accepted whether or not the card is due.
    let mut last = None;
    for _ in 0..25 {
        let result = engine.submit_review("alice", card.id, 5).await.unwrap();
        assert!(result.interval_days <= 36_500);
        last = Some(result);
    }

    let last = last.unwrap();
    assert_eq!(last.interval_days, 36_500);
    assert_eq!(last.next_review, start() + Duration::days(36_500));
    assert_eq!(last.new_status, LearningStatus::Mastered);

    let stored = engine.get_card("alice", card.id).await.unwrap();
    assert_eq!(stored.repetition_number, 25);
    assert_eq!(stored.next_review, Some(last.next_review));
    assert!(engine.list_due("alice", None).await.unwrap().is_empty());
    assert_eq!(engine.get_stats("alice").await.unwrap().mastered, 1);
}

#[tokio::test]
async fn test_long_perfect_streak_in_memory() {
    long_perfect_streak(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_long_perfect_streak_sqlite() {
    long_perfect_streak(Fixture::sqlite()).await;
}

#[tokio::test]
async fn test_stats_breakdown_in_memory() {
    stats_breakdown(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_stats_breakdown_sqlite() {
    stats_breakdown(Fixture::sqlite()).await;
}

async fn learner_isolation(fx: Fixture) {
    let engine = fx.engine(EngineConfig::default());
    let card = engine.add_word("alice", "katt").await.unwrap();

    let err = engine.submit_review("bob", card.id, 5).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotFound);
    let err = engine.get_card("bob", card.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotFound);
    assert!(engine.list_due("bob", None).await.unwrap().is_empty());
    assert_eq!(engine.get_stats("bob").await.unwrap().total, 0);

    // Bob's failed attempt left Alice's card untouched.
    let stored = engine.get_card("alice", card.id).await.unwrap();
    assert_eq!(stored.times_seen, 0);
    assert_eq!(stored.version, 0);
}

#[tokio::test]
async fn test_learner_isolation_in_memory() {
    learner_isolation(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_learner_isolation_sqlite() {
    learner_isolation(Fixture::sqlite()).await;
}

async fn vocabulary_listing(fx: Fixture) {
    let engine = fx.engine(EngineConfig::default());
    let mut added = Vec::new();
    for word in ["ett", "tva", "tre", "fyra"] {
        added.push(engine.add_word("alice", word).await.unwrap());
        fx.clock.advance(Duration::minutes(1));
    }
    engine.submit_review("alice", added[0].id, 1).await.unwrap();

    let all = engine
        .list_vocabulary("alice", &VocabularyQuery::new())
        .await
        .unwrap();
    let words: Vec<&str> = all.iter().map(|c| c.word_id.as_str()).collect();
    assert_eq!(words, vec!["fyra", "tre", "tva", "ett"]);

    let struggling = engine
        .list_vocabulary(
            "alice",
            &VocabularyQuery::new().with_status(LearningStatus::ReviewNeeded),
        )
        .await
        .unwrap();
    assert_eq!(struggling.len(), 1);
    assert_eq!(struggling[0].word_id, "ett");

    let page = engine
        .list_vocabulary("alice", &VocabularyQuery::new().with_limit(2).with_offset(2))
        .await
        .unwrap();
    let words: Vec<&str> = page.iter().map(|c| c.word_id.as_str()).collect();
    assert_eq!(words, vec!["tva", "ett"]);

    engine.remove_word("alice", added[1].id).await.unwrap();
    assert_eq!(engine.get_stats("alice").await.unwrap().total, 3);
}

#[tokio::test]
async fn test_vocabulary_listing_in_memory() {
    vocabulary_listing(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_vocabulary_listing_sqlite() {
    vocabulary_listing(Fixture::sqlite()).await;
}

async fn compare_and_swap(fx: Fixture) {
    let config = EngineConfig::builder()
        .write_mode(WriteMode::CompareAndSwap)
        .quality_policy(QualityPolicy::Reject)
        .build()
        .unwrap();
    let engine = fx.engine(config);
    let card = engine.add_word("alice", "fisk").await.unwrap();

    let err = engine.submit_review("alice", card.id, 9).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValQualityOutOfRange);

    engine.submit_review("alice", card.id, 4).await.unwrap();
    engine
        .set_notes("alice", card.id, Some("fish".to_string()))
        .await
        .unwrap();

    let stored = engine.get_card("alice", card.id).await.unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.user_notes.as_deref(), Some("fish"));
    assert_eq!(stored.times_seen, 1);

    // A writer holding the pre-review snapshot loses.
    let mut stale = card.clone();
    stale.version += 1;
    assert!(!fx.store.update_if_version(&stale, card.version).await.unwrap());
}

#[tokio::test]
async fn test_compare_and_swap_in_memory() {
    compare_and_swap(Fixture::in_memory()).await;
}

#[tokio::test]
async fn test_compare_and_swap_sqlite() {
    compare_and_swap(Fixture::sqlite()).await;
}

#[tokio::test]
async fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::builder()
        .database_path(dir.path().join("recall").join("vocabulary.db"))
        .build()
        .unwrap();

    let card_id = {
        let engine = VocabularyEngine::open(config.clone()).unwrap();
        let card = engine.add_word("alice", "hund").await.unwrap();
        engine.submit_review("alice", card.id, 5).await.unwrap();
        card.id
    };

    let engine = VocabularyEngine::open(config).unwrap();
    let card = engine.get_card("alice", card_id).await.unwrap();
    assert_eq!(card.repetition_number, 1);
    assert_eq!(card.status, LearningStatus::Learning);
    assert!(card.next_review.is_some());
}
