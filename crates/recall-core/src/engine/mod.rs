//! Engine components: due selection, review submission, statistics, and the
//! [`VocabularyEngine`] facade that wires them to a store and a clock.

mod due;
mod review;
mod stats;
mod vocabulary;

pub use due::DueSelector;
pub use review::ReviewOrchestrator;
pub use stats::StatsAggregator;
pub use vocabulary::VocabularyEngine;
