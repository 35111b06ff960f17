//! Status classification after a successful recall.

use crate::types::{LearningStatus, Quality};

/// Streak length at which a card leaves `Learning`.
const FAMILIAR_FROM: u32 = 3;
/// Streak length above which a card may become `Mastered`.
const MASTERY_ABOVE: u32 = 5;
/// Quality required on the answer that promotes a card to `Mastered`.
const MASTERY_QUALITY: u8 = 4;

/// Derive the learning status from the new repetition streak and the answer.
///
/// Only meaningful on the success path; a failed answer is always
/// [`LearningStatus::ReviewNeeded`] regardless of this function.
pub fn classify(repetition_number: u32, quality: Quality) -> LearningStatus {
    match repetition_number {
        0 => LearningStatus::New,
        n if n < FAMILIAR_FROM => LearningStatus::Learning,
        n if n <= MASTERY_ABOVE => LearningStatus::Familiar,
        _ if quality.value() >= MASTERY_QUALITY => LearningStatus::Mastered,
        _ => LearningStatus::Familiar,
    }
}
