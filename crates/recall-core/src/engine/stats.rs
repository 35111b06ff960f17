//! Vocabulary statistics.

use std::sync::Arc;

use crate::error::RecallResult;
use crate::traits::{CardStore, Clock};
use crate::types::VocabularyStats;

/// Summarizes a learner's vocabulary by status.
pub struct StatsAggregator {
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn CardStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Per-status counts plus the number of cards due right now.
    pub async fn stats(&self, learner_id: &str) -> RecallResult<VocabularyStats> {
        let counts = self.store.count_by_status_for_learner(learner_id).await?;
        let due = self
            .store
            .count_due_for_learner(learner_id, self.clock.now())
            .await?;

        Ok(VocabularyStats::from_counts(&counts, due))
    }
}
