//! Custom error types for Libris
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Libris operations
#[derive(Error, Debug)]
pub enum LibrisError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and operator input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// No copies of the book are left to lend
    #[error("Book is currently unavailable: {title}")]
    Unavailable { title: String },

    /// Bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The per-login attempt budget is exhausted
    #[error("Maximum login attempts exceeded ({attempts})")]
    TooManyAttempts { attempts: u32 },

    /// Password does not satisfy the role policy
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Password confirmation did not match
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Credential codec could not represent the input
    #[error("Credential codec error: {0}")]
    Codec(String),

    /// Backing file could not be opened, locked or written
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Session was idle for longer than the configured timeout
    #[error("Session timed out after {idle_secs} seconds of inactivity")]
    SessionExpired { idle_secs: i64 },

    /// The operator's input stream was closed
    #[error("Input stream closed")]
    EndOfInput,
}

impl LibrisError {
    /// Create a "not found" error for books
    pub fn book_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Book",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Bad credentials and exhausted attempts both count as unauthorized
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::TooManyAttempts { .. })
    }

    /// Closed input unwinds every menu back to `main`
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LibrisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LibrisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Libris operations
pub type LibrisResult<T> = Result<T, LibrisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibrisError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LibrisError::book_not_found("42");
        assert_eq!(err.to_string(), "Book not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unauthorized_covers_attempt_exhaustion() {
        assert!(LibrisError::Unauthorized("bad password".into()).is_unauthorized());
        assert!(LibrisError::TooManyAttempts { attempts: 3 }.is_unauthorized());
        assert!(!LibrisError::PasswordMismatch.is_unauthorized());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LibrisError = io_err.into();
        assert!(matches!(err, LibrisError::Io(_)));
    }
}
