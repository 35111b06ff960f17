//! Vocabulary listing query.

use serde::{Deserialize, Serialize};

use super::status::LearningStatus;

/// Default page size for vocabulary listings.
pub const DEFAULT_VOCABULARY_LIMIT: usize = 50;
/// Largest page size for vocabulary listings.
pub const MAX_VOCABULARY_LIMIT: usize = 100;

/// Filter and pagination for listing a learner's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyQuery {
    /// Only cards in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LearningStatus>,
    /// Page size (1-100).
    pub limit: usize,
    /// Cards to skip.
    pub offset: usize,
}

impl Default for VocabularyQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_VOCABULARY_LIMIT,
            offset: 0,
        }
    }
}

impl VocabularyQuery {
    /// Create a query with default pagination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one status.
    pub fn with_status(mut self, status: LearningStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}
