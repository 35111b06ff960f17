//! recall-core - Core library for recall.
//!
//! This crate provides SM-2 spaced-repetition scheduling for vocabulary
//! cards: the interval calculator, the review workflow, due-card selection,
//! statistics, and SQLite / in-memory card stores.
//!
//! # Example
//!
//! ```ignore
//! use recall_core::{EngineConfig, VocabularyEngine};
//!
//! let engine = VocabularyEngine::open(EngineConfig::default())?;
//!
//! // Start learning a word
//! let card = engine.add_word("learner-1", "hund").await?;
//!
//! // Review whatever is due, grading each answer 0-5
//! for card in engine.list_due("learner-1", None).await? {
//!     let result = engine.submit_review("learner-1", card.id, 4).await?;
//!     println!("next review in {} days", result.interval_days);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduling;
pub mod stores;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, QualityPolicy, SchedulerConfig, WriteMode};
pub use engine::{DueSelector, ReviewOrchestrator, StatsAggregator, VocabularyEngine};
pub use error::{ErrorCode, RecallError, RecallResult};
pub use scheduling::{classify, retention_score, IntervalCalculator};
pub use stores::{InMemoryCardStore, SqliteCardStore};
pub use traits::{CardStore, Clock, ManualClock, SystemClock};
pub use types::{
    LearningStatus, Quality, ReviewResult, ScheduleOutcome, ScheduleState, VocabularyCard,
    VocabularyQuery, VocabularyStats,
};
