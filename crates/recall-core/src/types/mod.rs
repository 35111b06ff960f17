//! Core types for recall.

mod card;
mod quality;
mod query;
mod review;
mod schedule;
mod stats;
mod status;

pub use card::VocabularyCard;
pub use quality::Quality;
pub use query::{VocabularyQuery, DEFAULT_VOCABULARY_LIMIT, MAX_VOCABULARY_LIMIT};
pub use review::ReviewResult;
pub use schedule::{ScheduleOutcome, ScheduleState};
pub use stats::VocabularyStats;
pub use status::LearningStatus;
