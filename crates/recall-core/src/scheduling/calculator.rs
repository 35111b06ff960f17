//! SM-2 interval calculator.
//!
//! Computes a card's next scheduling state from its current state and the
//! quality of the learner's answer:
//!
//! ```text
//! EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
//!
//! q >= 3:  I' = 1 (n = 0), 6 (n = 1), round(I * EF') (n >= 2);  n' = n + 1
//! q <  3:  I' = 1;  n' = 0;  status = ReviewNeeded
//! ```
//!
//! The next review is anchored at the answer instant, not at the previous
//! due date. Intervals never exceed `maximum_interval_days`.

use chrono::{DateTime, Duration, Utc};

use super::classifier::classify;
use crate::config::SchedulerConfig;
use crate::error::{RecallError, RecallResult};
use crate::types::{LearningStatus, Quality, ScheduleOutcome, ScheduleState};

/// SM-2 interval calculator.
///
/// Pure: the result depends only on the configuration and the arguments.
#[derive(Debug, Clone, Default)]
pub struct IntervalCalculator {
    config: SchedulerConfig,
}

impl IntervalCalculator {
    /// Create a calculator with the given SM-2 constants.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// SM-2 constants in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedule the next review after an answer of `quality` given at `now`.
    pub fn calculate(
        &self,
        state: &ScheduleState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> RecallResult<ScheduleOutcome> {
        let new_ease = self.next_ease_factor(state.ease_factor, quality);

        let (interval_days, repetition_number, status) = if quality.is_success() {
            let interval = match state.repetition_number {
                0 => self.config.first_interval_days,
                1 => self.config.second_interval_days,
                _ => grow_interval(state.interval_days, new_ease),
            }
            .min(self.config.maximum_interval_days);
            let repetition = state.repetition_number + 1;
            (interval, repetition, classify(repetition, quality))
        } else {
            (1, 0, LearningStatus::ReviewNeeded)
        };

        let next_review = now
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .ok_or_else(|| {
                RecallError::Internal(format!(
                    "Next review {} days after {} is out of range",
                    interval_days, now
                ))
            })?;

        Ok(ScheduleOutcome {
            ease_factor: round_to_hundredths(new_ease),
            interval_days,
            repetition_number,
            next_review,
            status,
        })
    }

    /// Schedule an answer given as a raw integer, clamping it to 0..=5.
    pub fn calculate_raw(
        &self,
        state: &ScheduleState,
        quality: i32,
        now: DateTime<Utc>,
    ) -> RecallResult<ScheduleOutcome> {
        self.calculate(state, Quality::clamped(quality), now)
    }

    /// Interval each quality score would produce, indexed by quality.
    pub fn preview_intervals(
        &self,
        state: &ScheduleState,
        now: DateTime<Utc>,
    ) -> RecallResult<[u32; 6]> {
        let mut intervals = [0; 6];
        for (q, slot) in intervals.iter_mut().enumerate() {
            *slot = self.calculate_raw(state, q as i32, now)?.interval_days;
        }
        Ok(intervals)
    }

    fn next_ease_factor(&self, ease_factor: f64, quality: Quality) -> f64 {
        let d = quality.shortfall();
        let adjusted = ease_factor + (0.1 - d * (0.08 + d * 0.02));
        adjusted.max(self.config.minimum_ease_factor)
    }
}

/// `round(interval * ease)`, ties to even, never below one day.
fn grow_interval(interval_days: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval_days) * ease_factor).round_ties_even();
    if grown >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (grown as u32).max(1)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
