//! Card store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::RecallResult;
use crate::types::{LearningStatus, VocabularyCard, VocabularyQuery};

/// Persistence collaborator for vocabulary cards.
///
/// Every lookup is scoped to a learner: a card owned by someone else is
/// indistinguishable from a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Get a learner's card by ID.
    async fn find_by_learner_and_id(
        &self,
        learner_id: &str,
        card_id: Uuid,
    ) -> RecallResult<Option<VocabularyCard>>;

    /// Get a learner's card for a word.
    async fn find_by_learner_and_word(
        &self,
        learner_id: &str,
        word_id: &str,
    ) -> RecallResult<Option<VocabularyCard>>;

    /// Insert a new card. Fails with Conflict if the learner already has the word.
    async fn insert(&self, card: &VocabularyCard) -> RecallResult<()>;

    /// Delete a learner's card. Returns whether a card was removed.
    async fn delete(&self, learner_id: &str, card_id: Uuid) -> RecallResult<bool>;

    /// Overwrite a card unconditionally, version included.
    ///
    /// Fails with NotFound if the card no longer exists.
    async fn update(&self, card: &VocabularyCard) -> RecallResult<()>;

    /// Overwrite a card only if its stored version is still `expected_version`.
    ///
    /// Returns `false` without writing when the version moved on or the card
    /// is gone.
    async fn update_if_version(
        &self,
        card: &VocabularyCard,
        expected_version: u64,
    ) -> RecallResult<bool>;

    /// Cards due at `now`: dated cards by ascending `next_review`, then
    /// never-scheduled cards, at most `limit`.
    async fn list_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> RecallResult<Vec<VocabularyCard>>;

    /// A page of the learner's cards, newest first.
    async fn list_for_learner(
        &self,
        learner_id: &str,
        query: &VocabularyQuery,
    ) -> RecallResult<Vec<VocabularyCard>>;

    /// Card count per status. Statuses without cards may be absent.
    async fn count_by_status_for_learner(
        &self,
        learner_id: &str,
    ) -> RecallResult<HashMap<LearningStatus, usize>>;

    /// Number of cards due at `now`.
    async fn count_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> RecallResult<usize>;
}
