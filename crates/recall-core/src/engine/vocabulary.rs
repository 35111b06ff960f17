//! Learner-facing vocabulary engine.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{DueSelector, ReviewOrchestrator, StatsAggregator};
use crate::config::EngineConfig;
use crate::error::{RecallError, RecallResult};
use crate::scheduling::IntervalCalculator;
use crate::stores::SqliteCardStore;
use crate::traits::{CardStore, Clock, SystemClock};
use crate::types::{
    ReviewResult, VocabularyCard, VocabularyQuery, VocabularyStats, MAX_VOCABULARY_LIMIT,
};

/// Entry point for everything a learner does with their vocabulary.
///
/// Owns the card store, the clock and the configuration; every operation is
/// scoped to one learner.
pub struct VocabularyEngine {
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    due: DueSelector,
    reviews: ReviewOrchestrator,
    stats: StatsAggregator,
}

impl VocabularyEngine {
    /// Create an engine over an existing store and clock.
    pub fn new(
        store: Arc<dyn CardStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> RecallResult<Self> {
        config.validate()?;

        let due = DueSelector::new(
            store.clone(),
            clock.clone(),
            config.due_limit_default,
            config.due_limit_max,
        );
        let reviews = ReviewOrchestrator::new(
            store.clone(),
            clock.clone(),
            IntervalCalculator::new(config.scheduler.clone()),
            config.quality_policy,
            config.write_mode,
        );
        let stats = StatsAggregator::new(store.clone(), clock.clone());

        Ok(Self {
            store,
            clock,
            config,
            due,
            reviews,
            stats,
        })
    }

    /// Open the SQLite database named in `config`, on wall-clock time.
    pub fn open(config: EngineConfig) -> RecallResult<Self> {
        let store = SqliteCardStore::new(&config.database_path)?;
        info!(path = %config.database_path.display(), "Opened vocabulary database");
        Self::new(Arc::new(store), Arc::new(SystemClock), config)
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start tracking a word for a learner.
    pub async fn add_word(&self, learner_id: &str, word_id: &str) -> RecallResult<VocabularyCard> {
        if word_id.trim().is_empty() {
            return Err(RecallError::validation("Word ID must not be empty"));
        }
        if self
            .store
            .find_by_learner_and_word(learner_id, word_id)
            .await?
            .is_some()
        {
            return Err(RecallError::duplicate_word(learner_id, word_id));
        }

        let card = VocabularyCard::new(learner_id, word_id, &self.config.scheduler, self.clock.now());
        self.store.insert(&card).await?;

        info!(learner_id, word_id, card_id = %card.id, "Added word to vocabulary");
        Ok(card)
    }

    /// Stop tracking a word.
    pub async fn remove_word(&self, learner_id: &str, card_id: Uuid) -> RecallResult<()> {
        if !self.store.delete(learner_id, card_id).await? {
            return Err(RecallError::not_found(card_id.to_string()));
        }
        info!(learner_id, card_id = %card_id, "Removed word from vocabulary");
        Ok(())
    }

    /// Get one of the learner's cards.
    pub async fn get_card(&self, learner_id: &str, card_id: Uuid) -> RecallResult<VocabularyCard> {
        self.store
            .find_by_learner_and_id(learner_id, card_id)
            .await?
            .ok_or_else(|| RecallError::not_found(card_id.to_string()))
    }

    /// A page of the learner's cards, newest first.
    pub async fn list_vocabulary(
        &self,
        learner_id: &str,
        query: &VocabularyQuery,
    ) -> RecallResult<Vec<VocabularyCard>> {
        if !(1..=MAX_VOCABULARY_LIMIT).contains(&query.limit) {
            return Err(RecallError::limit_out_of_range(
                query.limit,
                1,
                MAX_VOCABULARY_LIMIT,
            ));
        }
        self.store.list_for_learner(learner_id, query).await
    }

    /// Replace the learner's notes on a card. Empty notes clear them.
    pub async fn set_notes(
        &self,
        learner_id: &str,
        card_id: Uuid,
        notes: Option<String>,
    ) -> RecallResult<VocabularyCard> {
        let mut card = self.get_card(learner_id, card_id).await?;
        card.user_notes = notes.filter(|n| !n.trim().is_empty());
        card.updated_at = self.clock.now();

        self.reviews.persist(&mut card).await?;
        debug!(learner_id, card_id = %card_id, "Updated notes");
        Ok(card)
    }

    /// Cards due for review now. `None` uses the configured default limit.
    pub async fn list_due(
        &self,
        learner_id: &str,
        limit: Option<usize>,
    ) -> RecallResult<Vec<VocabularyCard>> {
        self.due.select_due(learner_id, limit).await
    }

    /// Record an answer of `quality` (0-5) for a card.
    pub async fn submit_review(
        &self,
        learner_id: &str,
        card_id: Uuid,
        quality: i32,
    ) -> RecallResult<ReviewResult> {
        self.reviews.submit_review(learner_id, card_id, quality).await
    }

    /// Vocabulary summary for a learner.
    pub async fn get_stats(&self, learner_id: &str) -> RecallResult<VocabularyStats> {
        self.stats.stats(learner_id).await
    }
}
