//! Recall quality scores.

use serde::{Deserialize, Serialize};

use crate::error::{RecallError, RecallResult};

/// Self-assessed recall quality on the SM-2 scale (0-5).
///
/// - 0: Complete blackout, no memory
/// - 1: Wrong answer, but recognized when shown
/// - 2: Wrong answer, but easy to remember once seen
/// - 3: Correct with serious difficulty
/// - 4: Correct with some hesitation
/// - 5: Perfect, immediate recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality (blackout).
    pub const MIN: Quality = Quality(0);
    /// Highest quality (perfect recall).
    pub const MAX: Quality = Quality(5);
    /// Lowest quality that counts as a successful recall.
    pub const PASSING: Quality = Quality(3);

    /// Create a quality, rejecting values outside 0..=5.
    pub fn new(value: i32) -> RecallResult<Self> {
        if (0..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RecallError::quality_out_of_range(value))
        }
    }

    /// Create a quality, clamping values outside 0..=5 to the nearest bound.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, 5) as u8)
    }

    /// Raw score.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this answer counts as a successful recall.
    pub fn is_success(self) -> bool {
        self >= Self::PASSING
    }

    /// Distance from a perfect answer, the `5 - q` term of the SM-2 formula.
    pub(crate) fn shortfall(self) -> f64 {
        f64::from(5 - self.0)
    }
}

impl TryFrom<i32> for Quality {
    type Error = RecallError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}
