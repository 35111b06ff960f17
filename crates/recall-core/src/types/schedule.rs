//! SM-2 scheduling state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::LearningStatus;

/// Scheduling fields of a card, the input to interval calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Multiplier controlling how quickly intervals grow (>= 1.3).
    pub ease_factor: f64,
    /// Current gap between reviews in days (>= 1).
    pub interval_days: u32,
    /// Consecutive successful recalls since the last failure.
    pub repetition_number: u32,
}

impl ScheduleState {
    /// Create a schedule state from raw fields.
    pub fn new(ease_factor: f64, interval_days: u32, repetition_number: u32) -> Self {
        Self {
            ease_factor,
            interval_days,
            repetition_number,
        }
    }
}

/// Result of scheduling one answer: the card's next scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// New ease factor, rounded to two decimals.
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval_days: u32,
    /// New consecutive-success count.
    pub repetition_number: u32,
    /// The answer instant plus `interval_days` days.
    pub next_review: DateTime<Utc>,
    /// Status after this answer.
    pub status: LearningStatus,
}

impl ScheduleOutcome {
    /// Scheduling fields of the outcome, ready to feed the next calculation.
    pub fn state(&self) -> ScheduleState {
        ScheduleState::new(self.ease_factor, self.interval_days, self.repetition_number)
    }
}
