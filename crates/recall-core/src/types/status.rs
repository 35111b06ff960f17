//! Learning status of a vocabulary card.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Coarse learning status derived from a card's review history.
///
/// Statuses serialize to snake_case (`review_needed`) for storage and wire
/// compatibility; inside the engine they are always this closed enum.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LearningStatus {
    /// Added to the vocabulary but never successfully recalled.
    #[default]
    New,
    /// One or two successful recalls in a row.
    Learning,
    /// Three or more successful recalls in a row.
    Familiar,
    /// Long streak of confident recalls.
    Mastered,
    /// Last answer was a failure; the streak restarts.
    ReviewNeeded,
}

impl LearningStatus {
    /// All statuses, in lifecycle order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether a card in this status must have a zero repetition streak.
    pub fn resets_streak(self) -> bool {
        matches!(self, Self::New | Self::ReviewNeeded)
    }
}
