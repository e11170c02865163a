//! Error types for study-tracker

use crate::subject::InvalidField;
use crate::types::SubjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for study-tracker
#[derive(Debug, Error)]
pub enum StudyError {
    /// A required field is blank or out of range
    #[error("Validation error: {0}")]
    Validation(InvalidField),

    /// The store could not complete an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Folder scan, copy or export write failed
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export format not implemented or not enabled in this build
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// A renderer failed to produce output
    #[error("Failed to render {format}: {message}")]
    Render { format: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No subject with this ID
    #[error("Subject {0} not found")]
    NotFound(SubjectId),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StudyError>,
    },
}

impl StudyError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StudyError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap an IO error with the path it happened on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StudyError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Build a storage error from any displayable backend error
    pub fn storage(err: impl std::fmt::Display) -> Self {
        StudyError::Storage(err.to_string())
    }

    /// True for validation failures, which callers report themselves
    pub fn is_validation(&self) -> bool {
        match self {
            StudyError::Validation(_) => true,
            StudyError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Result type alias for study-tracker
pub type Result<T> = std::result::Result<T, StudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StudyError::NotFound(SubjectId(42));
        assert_eq!(err.to_string(), "Subject 42 not found");
    }

    #[test]
    fn test_validation_display_names_field() {
        let err = StudyError::Validation(InvalidField::Folder);
        assert!(err.to_string().contains("folder"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_with_context() {
        let err = StudyError::Validation(InvalidField::Name);
        let err = err.with_context("Failed to add subject");
        assert!(err.to_string().contains("Failed to add subject"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_filesystem_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = StudyError::filesystem("/tmp/nowhere", io_err);
        assert!(err.to_string().contains("/tmp/nowhere"));
        assert!(!err.is_validation());
    }
}
