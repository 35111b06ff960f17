//! Due-card selection.

use std::sync::Arc;
use tracing::debug;

use crate::error::{RecallError, RecallResult};
use crate::traits::{CardStore, Clock};
use crate::types::VocabularyCard;

/// Selects the cards a learner should review now.
pub struct DueSelector {
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
    default_limit: usize,
    max_limit: usize,
}

impl DueSelector {
    /// Create a selector with the given page bounds.
    pub fn new(
        store: Arc<dyn CardStore>,
        clock: Arc<dyn Clock>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        Self {
            store,
            clock,
            default_limit,
            max_limit,
        }
    }

    /// Resolve a requested page size against the configured bounds.
    pub fn resolve_limit(&self, limit: Option<usize>) -> RecallResult<usize> {
        match limit {
            None => Ok(self.default_limit),
            Some(limit) if (1..=self.max_limit).contains(&limit) => Ok(limit),
            Some(limit) => Err(RecallError::limit_out_of_range(limit, 1, self.max_limit)),
        }
    }

    /// Cards due for `learner_id`, most overdue first, never-scheduled last.
    pub async fn select_due(
        &self,
        learner_id: &str,
        limit: Option<usize>,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let limit = self.resolve_limit(limit)?;
        let now = self.clock.now();

        let cards = self.store.list_due_for_learner(learner_id, now, limit).await?;
        debug!(learner_id, limit, count = cards.len(), "Selected due cards");
        Ok(cards)
    }
}
