//! Vocabulary card types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quality::Quality;
use super::schedule::{ScheduleOutcome, ScheduleState};
use super::status::LearningStatus;
use crate::config::SchedulerConfig;
use crate::scheduling::retention_score;

/// A learner's progress on one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyCard {
    /// Unique identifier for the card.
    pub id: Uuid,
    /// Owner of the card.
    pub learner_id: String,
    /// Dictionary key of the word being learned.
    pub word_id: String,
    /// Current learning status.
    pub status: LearningStatus,
    /// SM-2 ease factor (>= 1.3).
    pub ease_factor: f64,
    /// Current interval in days (>= 1).
    pub interval_days: u32,
    /// Consecutive successful recalls.
    pub repetition_number: u32,
    /// Total answers submitted.
    pub times_seen: u32,
    /// Answers with quality >= 3.
    pub times_correct: u32,
    /// Answers with quality < 3.
    pub times_incorrect: u32,
    /// When the last answer was submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the card is next due. `None` means never scheduled, due now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    /// Learner's personal notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Incremented on every persisted update.
    #[serde(default)]
    pub version: u64,
}

impl VocabularyCard {
    /// Create a fresh card for a word the learner just added.
    pub fn new(
        learner_id: impl Into<String>,
        word_id: impl Into<String>,
        config: &SchedulerConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            learner_id: learner_id.into(),
            word_id: word_id.into(),
            status: LearningStatus::New,
            ease_factor: config.initial_ease_factor,
            interval_days: config.initial_interval_days,
            repetition_number: 0,
            times_seen: 0,
            times_correct: 0,
            times_incorrect: 0,
            last_reviewed: None,
            next_review: None,
            user_notes: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Set the user notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.user_notes = Some(notes.into());
        self
    }

    /// Set the next review date.
    pub fn with_next_review(mut self, next_review: DateTime<Utc>) -> Self {
        self.next_review = Some(next_review);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: LearningStatus) -> Self {
        self.status = status;
        self
    }

    /// Scheduling fields, as input for the interval calculator.
    pub fn schedule_state(&self) -> ScheduleState {
        ScheduleState::new(self.ease_factor, self.interval_days, self.repetition_number)
    }

    /// Whether the card is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |due| due <= now)
    }

    /// Fold one scheduled answer into the card.
    pub fn record_review(&mut self, outcome: &ScheduleOutcome, quality: Quality, now: DateTime<Utc>) {
        self.ease_factor = outcome.ease_factor;
        self.interval_days = outcome.interval_days;
        self.repetition_number = outcome.repetition_number;
        self.next_review = Some(outcome.next_review);
        self.status = outcome.status;
        self.last_reviewed = Some(now);
        self.updated_at = now;
        self.times_seen += 1;
        if quality.is_success() {
            self.times_correct += 1;
        } else {
            self.times_incorrect += 1;
        }
        debug_assert!(
            !self.status.resets_streak() || self.repetition_number == 0,
            "{} card with repetition streak {}",
            self.status,
            self.repetition_number
        );
    }

    /// Combined accuracy/ease score in 0..=100.
    pub fn retention_score(&self) -> f64 {
        retention_score(self.times_correct, self.times_incorrect, self.ease_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_card_defaults() {
        let card = VocabularyCard::new("alice", "hund", &SchedulerConfig::default(), now());
        assert_eq!(card.status, LearningStatus::New);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.interval_days, 1);
        assert_eq!(card.repetition_number, 0);
        assert_eq!(card.times_seen, 0);
        assert!(card.last_reviewed.is_none());
        assert!(card.next_review.is_none());
        assert_eq!(card.version, 0);
    }

    #[test]
    fn test_new_card_uses_configured_defaults() {
        let config = SchedulerConfig {
            initial_ease_factor: 2.0,
            initial_interval_days: 2,
            ..Default::default()
        };
        let card = VocabularyCard::new("alice", "hund", &config, now());
        assert_eq!(card.ease_factor, 2.0);
        assert_eq!(card.interval_days, 2);
    }

    #[test]
    fn test_unscheduled_card_is_due() {
        let card = VocabularyCard::new("alice", "hund", &SchedulerConfig::default(), now());
        assert!(card.is_due(now()));
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let card = VocabularyCard::new("alice", "hund", &SchedulerConfig::default(), now())
            .with_next_review(now());
        assert!(card.is_due(now()));
        assert!(!card.is_due(now() - Duration::seconds(1)));
    }

    #[test]
    fn test_record_review_updates_counters() {
        let mut card = VocabularyCard::new("alice", "hund", &SchedulerConfig::default(), now());
        let outcome = ScheduleOutcome {
            ease_factor: 2.6,
            interval_days: 1,
            repetition_number: 1,
            next_review: now() + Duration::days(1),
            status: LearningStatus::Learning,
        };

        card.record_review(&outcome, Quality::MAX, now());
        assert_eq!(card.times_seen, 1);
        assert_eq!(card.times_correct, 1);
        assert_eq!(card.times_incorrect, 0);
        assert_eq!(card.last_reviewed, Some(now()));
        assert_eq!(card.next_review, Some(now() + Duration::days(1)));
        assert_eq!(card.status, LearningStatus::Learning);

        let lapse = ScheduleOutcome {
            ease_factor: 2.3,
            interval_days: 1,
            repetition_number: 0,
            next_review: now() + Duration::days(1),
            status: LearningStatus::ReviewNeeded,
        };
        card.record_review(&lapse, Quality::clamped(1), now());
        assert_eq!(card.times_seen, 2);
        assert_eq!(card.times_incorrect, 1);
        assert_eq!(card.repetition_number, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "repetition streak")]
    fn test_record_review_rejects_streak_on_reset_status() {
        let mut card = VocabularyCard::new("alice", "hund", &SchedulerConfig::default(), now());
        let inconsistent = ScheduleOutcome {
            ease_factor: 2.5,
            interval_days: 6,
            repetition_number: 2,
            next_review: now() + Duration::days(6),
            status: LearningStatus::ReviewNeeded,
        };
        card.record_review(&inconsistent, Quality::clamped(1), now());
    }
}
