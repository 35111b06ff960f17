//! Spaced-repetition scheduling.
//!
//! Pure functions only: nothing here reads the clock or touches storage.

mod calculator;
mod classifier;
mod retention;

pub use calculator::IntervalCalculator;
pub use classifier::classify;
pub use retention::retention_score;
