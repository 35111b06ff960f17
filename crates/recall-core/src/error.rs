//! Error types for recall operations.
//!
//! Errors carry a structured [`ErrorCode`] so callers (an HTTP layer, a CLI)
//! can map them onto their own failure surface without string matching.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for recall operations.
pub type RecallResult<T> = Result<T, RecallError>;

/// Main error type for all recall operations.
#[derive(Error, Debug)]
pub enum RecallError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Card not found, or not owned by the requesting learner.
    #[error("Card not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        card_id: Option<String>,
    },

    /// The operation collides with existing state.
    #[error("Conflict: {message}")]
    Conflict { message: String, code: ErrorCode },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValQualityOutOfRange,
    ValLimitOutOfRange,

    // Cards (CARD_xxx)
    CardNotFound,
    CardDuplicateWord,
    CardVersionMismatch,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,
    DbCorruptedRow,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValQualityOutOfRange => "VAL_002",
            ErrorCode::ValLimitOutOfRange => "VAL_003",
            ErrorCode::CardNotFound => "CARD_001",
            ErrorCode::CardDuplicateWord => "CARD_002",
            ErrorCode::CardVersionMismatch => "CARD_003",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::DbCorruptedRow => "DB_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RecallError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error for a quality score outside 0..=5.
    pub fn quality_out_of_range(quality: i32) -> Self {
        Self::Validation {
            message: format!("Quality {} is outside the 0-5 range", quality),
            code: ErrorCode::ValQualityOutOfRange,
            details: HashMap::from([("quality".to_string(), quality.to_string())]),
            suggestion: Some("Submit a quality between 0 (blackout) and 5 (perfect)".to_string()),
        }
    }

    /// Create a validation error for a page size outside its allowed bounds.
    pub fn limit_out_of_range(limit: usize, min: usize, max: usize) -> Self {
        Self::Validation {
            message: format!("Limit {} is outside the {}-{} range", limit, min, max),
            code: ErrorCode::ValLimitOutOfRange,
            details: HashMap::from([
                ("limit".to_string(), limit.to_string()),
                ("min".to_string(), min.to_string()),
                ("max".to_string(), max.to_string()),
            ]),
            suggestion: None,
        }
    }

    /// Create a not found error.
    pub fn not_found(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::NotFound {
            message: format!("Card with id '{}' not found", id),
            code: ErrorCode::CardNotFound,
            card_id: Some(id),
        }
    }

    /// Create a conflict error for a word already in the learner's vocabulary.
    pub fn duplicate_word(learner_id: &str, word_id: &str) -> Self {
        Self::Conflict {
            message: format!(
                "Word '{}' is already in the vocabulary of learner '{}'",
                word_id, learner_id
            ),
            code: ErrorCode::CardDuplicateWord,
        }
    }

    /// Create a conflict error for a concurrent modification.
    pub fn version_mismatch(card_id: impl Into<String>, expected: u64) -> Self {
        Self::Conflict {
            message: format!(
                "Card '{}' was modified concurrently (expected version {})",
                card_id.into(),
                expected
            ),
            code: ErrorCode::CardVersionMismatch,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a database error for a row that cannot be decoded.
    pub fn corrupted_row(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbCorruptedRow,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::Database { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether the failure was caused by the caller rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Conflict { .. }
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Please check the card ID and ensure it belongs to you"),
            Self::Conflict {
                code: ErrorCode::CardVersionMismatch,
                ..
            } => Some("Reload the card and submit the review again"),
            Self::Conflict { .. } => Some("The word is already in your vocabulary"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RecallError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::CannotOpen =>
            {
                ErrorCode::DbConnectionFailed
            }
            _ => ErrorCode::DbOperationFailed,
        };
        Self::Database {
            message: err.to_string(),
            code,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = RecallError::validation("Invalid input");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("Invalid input"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_quality_out_of_range() {
        let err = RecallError::quality_out_of_range(7);
        assert_eq!(err.code(), ErrorCode::ValQualityOutOfRange);
        assert!(err.to_string().contains('7'));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_not_found_error() {
        let err = RecallError::not_found("card-1");
        assert_eq!(err.code(), ErrorCode::CardNotFound);
        assert!(err.suggestion().is_some());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_conflict_suggestions_differ() {
        let dup = RecallError::duplicate_word("alice", "hund");
        let race = RecallError::version_mismatch("card-1", 3);
        assert_eq!(dup.code(), ErrorCode::CardDuplicateWord);
        assert_eq!(race.code(), ErrorCode::CardVersionMismatch);
        assert_ne!(dup.suggestion(), race.suggestion());
    }

    #[test]
    fn test_database_error_is_not_client_error() {
        let err = RecallError::database("disk full");
        assert_eq!(err.code(), ErrorCode::DbOperationFailed);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValInvalidInput.as_str(), "VAL_001");
        assert_eq!(ErrorCode::CardNotFound.as_str(), "CARD_001");
        assert_eq!(ErrorCode::DbCorruptedRow.as_str(), "DB_003");
    }
}
