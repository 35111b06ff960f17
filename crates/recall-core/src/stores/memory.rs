//! In-memory card store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{RecallError, RecallResult};
use crate::traits::CardStore;
use crate::types::{LearningStatus, VocabularyCard, VocabularyQuery};

/// Card store backed by a map, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryCardStore {
    cards: RwLock<HashMap<Uuid, VocabularyCard>>,
}

impl InMemoryCardStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of cards across all learners.
    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    /// Whether the store holds no cards.
    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }
}

/// Dated cards by ascending `next_review`, unscheduled cards last;
/// ties broken by creation time, then ID.
fn due_order(a: &VocabularyCard, b: &VocabularyCard) -> Ordering {
    let key = |card: &VocabularyCard| (card.next_review.is_none(), card.next_review);
    key(a)
        .cmp(&key(b))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn owned_by<'a>(card: &'a VocabularyCard, learner_id: &str) -> Option<&'a VocabularyCard> {
    (card.learner_id == learner_id).then_some(card)
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn find_by_learner_and_id(
        &self,
        learner_id: &str,
        card_id: Uuid,
    ) -> RecallResult<Option<VocabularyCard>> {
        let cards = self.cards.read().await;
        Ok(cards
            .get(&card_id)
            .and_then(|card| owned_by(card, learner_id))
            .cloned())
    }

    async fn find_by_learner_and_word(
        &self,
        learner_id: &str,
        word_id: &str,
    ) -> RecallResult<Option<VocabularyCard>> {
        let cards = self.cards.read().await;
        Ok(cards
            .values()
            .find(|card| card.learner_id == learner_id && card.word_id == word_id)
            .cloned())
    }

    async fn insert(&self, card: &VocabularyCard) -> RecallResult<()> {
        let mut cards = self.cards.write().await;
        if cards
            .values()
            .any(|c| c.learner_id == card.learner_id && c.word_id == card.word_id)
        {
            return Err(RecallError::duplicate_word(&card.learner_id, &card.word_id));
        }
        cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn delete(&self, learner_id: &str, card_id: Uuid) -> RecallResult<bool> {
        let mut cards = self.cards.write().await;
        match cards.get(&card_id) {
            Some(card) if card.learner_id == learner_id => {
                cards.remove(&card_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update(&self, card: &VocabularyCard) -> RecallResult<()> {
        let mut cards = self.cards.write().await;
        match cards.get_mut(&card.id) {
            Some(existing) if existing.learner_id == card.learner_id => {
                *existing = card.clone();
                Ok(())
            }
            _ => Err(RecallError::not_found(card.id.to_string())),
        }
    }

    async fn update_if_version(
        &self,
        card: &VocabularyCard,
        expected_version: u64,
    ) -> RecallResult<bool> {
        let mut cards = self.cards.write().await;
        match cards.get_mut(&card.id) {
            Some(existing)
                if existing.learner_id == card.learner_id
                    && existing.version == expected_version =>
            {
                *existing = card.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let cards = self.cards.read().await;
        let mut due: Vec<&VocabularyCard> = cards
            .values()
            .filter(|card| card.learner_id == learner_id && card.is_due(now))
            .collect();
        due.sort_by(|a, b| due_order(a, b));

        Ok(due.into_iter().take(limit).cloned().collect())
    }

    async fn list_for_learner(
        &self,
        learner_id: &str,
        query: &VocabularyQuery,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let cards = self.cards.read().await;
        let mut matching: Vec<&VocabularyCard> = cards
            .values()
            .filter(|card| card.learner_id == learner_id)
            .filter(|card| query.status.map_or(true, |status| card.status == status))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn count_by_status_for_learner(
        &self,
        learner_id: &str,
    ) -> RecallResult<HashMap<LearningStatus, usize>> {
        let cards = self.cards.read().await;
        let mut counts = HashMap::new();
        for card in cards.values().filter(|card| card.learner_id == learner_id) {
            *counts.entry(card.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> RecallResult<usize> {
        let cards = self.cards.read().await;
        Ok(cards
            .values()
            .filter(|card| card.learner_id == learner_id && card.is_due(now))
            .count())
    }
}
