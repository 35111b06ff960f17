//! Review submission result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::VocabularyCard;
use super::status::LearningStatus;

/// What a caller learns after submitting an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub card_id: Uuid,
    pub new_status: LearningStatus,
    pub next_review: DateTime<Utc>,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub repetition_number: u32,
}

impl ReviewResult {
    /// Summarize a card that was just reviewed.
    ///
    /// Returns `None` if the card has never been scheduled.
    pub fn from_card(card: &VocabularyCard) -> Option<Self> {
        Some(Self {
            card_id: card.id,
            new_status: card.status,
            next_review: card.next_review?,
            interval_days: card.interval_days,
            ease_factor: card.ease_factor,
            repetition_number: card.repetition_number,
        })
    }
}
