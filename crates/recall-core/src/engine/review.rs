//! Review submission workflow.
//!
//! One submission is a single read-modify-write of one card: load the card,
//! schedule the answer against the clock's current instant, fold the outcome
//! into the card and persist it according to the configured [`WriteMode`].

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{QualityPolicy, WriteMode};
use crate::error::{RecallError, RecallResult};
use crate::scheduling::IntervalCalculator;
use crate::traits::{CardStore, Clock};
use crate::types::{Quality, ReviewResult, VocabularyCard};

/// Applies learner answers to cards.
pub struct ReviewOrchestrator {
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
    calculator: IntervalCalculator,
    quality_policy: QualityPolicy,
    write_mode: WriteMode,
}

impl ReviewOrchestrator {
    pub fn new(
        store: Arc<dyn CardStore>,
        clock: Arc<dyn Clock>,
        calculator: IntervalCalculator,
        quality_policy: QualityPolicy,
        write_mode: WriteMode,
    ) -> Self {
        Self {
            store,
            clock,
            calculator,
            quality_policy,
            write_mode,
        }
    }

    fn resolve_quality(&self, quality: i32) -> RecallResult<Quality> {
        match self.quality_policy {
            QualityPolicy::Clamp => {
                let clamped = Quality::clamped(quality);
                if i32::from(clamped.value()) != quality {
                    debug!(quality, clamped = clamped.value(), "Clamped quality score");
                }
                Ok(clamped)
            }
            QualityPolicy::Reject => Quality::new(quality),
        }
    }

    /// Record an answer of `quality` (0-5) for one of the learner's cards.
    pub async fn submit_review(
        &self,
        learner_id: &str,
        card_id: Uuid,
        quality: i32,
    ) -> RecallResult<ReviewResult> {
        let quality = self.resolve_quality(quality)?;

        let mut card = self
            .store
            .find_by_learner_and_id(learner_id, card_id)
            .await?
            .ok_or_else(|| RecallError::not_found(card_id.to_string()))?;

        let now = self.clock.now();
        let outcome = self
            .calculator
            .calculate(&card.schedule_state(), quality, now)?;
        card.record_review(&outcome, quality, now);

        self.persist(&mut card).await?;

        info!(
            learner_id,
            card_id = %card.id,
            quality = quality.value(),
            status = %card.status,
            interval_days = card.interval_days,
            "Review recorded"
        );

        ReviewResult::from_card(&card)
            .ok_or_else(|| RecallError::Internal("Reviewed card has no next review".to_string()))
    }

    /// Write a modified card back, bumping its version.
    pub(crate) async fn persist(&self, card: &mut VocabularyCard) -> RecallResult<()> {
        let expected = card.version;
        card.version += 1;

        match self.write_mode {
            WriteMode::LastWriteWins => self.store.update(card).await,
            WriteMode::CompareAndSwap => {
                if self.store.update_if_version(card, expected).await? {
                    Ok(())
                } else {
                    warn!(card_id = %card.id, expected, "Lost concurrent update");
                    Err(RecallError::version_mismatch(card.id.to_string(), expected))
                }
            }
        }
    }
}
