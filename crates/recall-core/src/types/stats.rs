//! Vocabulary statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::status::LearningStatus;

/// Per-learner vocabulary summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub familiar: usize,
    pub mastered: usize,
    pub review_needed: usize,
    pub due_for_review: usize,
}

impl VocabularyStats {
    /// Build stats from per-status counts; missing statuses count as zero.
    pub fn from_counts(counts: &HashMap<LearningStatus, usize>, due_for_review: usize) -> Self {
        let count = |status: LearningStatus| counts.get(&status).copied().unwrap_or(0);

        Self {
            total: counts.values().sum(),
            new: count(LearningStatus::New),
            learning: count(LearningStatus::Learning),
            familiar: count(LearningStatus::Familiar),
            mastered: count(LearningStatus::Mastered),
            review_needed: count(LearningStatus::ReviewNeeded),
            due_for_review,
        }
    }

    /// Count for a single status.
    pub fn count_for(&self, status: LearningStatus) -> usize {
        match status {
            LearningStatus::New => self.new,
            LearningStatus::Learning => self.learning,
            LearningStatus::Familiar => self.familiar,
            LearningStatus::Mastered => self.mastered,
            LearningStatus::ReviewNeeded => self.review_needed,
        }
    }
}
