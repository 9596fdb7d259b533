//! Error handling utilities for the nova application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//! Each concern has its own error enum so callers can match on the exact failure.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Represents input that the journal or onboarding stores refuse to persist.
///
/// These errors are user-correctable: nothing is written when they occur and
/// the caller is expected to show a notice and let the user fix the input.
///
/// # Examples
///
/// ```
/// use nova::errors::ValidationError;
///
/// let error = ValidationError::EmptyEntry;
/// assert!(format!("{}", error).contains("write something"));
///
/// let error = ValidationError::IncompleteSurvey {
///     missing: vec!["doingWell", "strugglingWith"],
/// };
/// assert!(format!("{}", error).contains("doingWell, strugglingWith"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The free journal and both emotion fields are blank.
    #[error("Empty entry. Please write something before saving.")]
    EmptyEntry,

    /// One or more required survey answers are blank.
    #[error("Incomplete survey. Please fill in the core vision, routine, and reflection fields (missing: {})", .missing.join(", "))]
    IncompleteSurvey {
        /// Serialized names of the blank required fields
        missing: Vec<&'static str>,
    },
}

/// Represents failures of the key-value persistence backend.
///
/// Variants fall into two classes: read failures (`Unreadable`, `Malformed`),
/// which loaders recover from by substituting defaults, and write failures
/// (`Unwritable`, `Encode`, `Locked`, `InvalidKey`), which are surfaced to the
/// caller as retryable.
///
/// # Examples
///
/// ```
/// use nova::errors::StorageError;
/// use std::io;
///
/// let error = StorageError::Unwritable {
///     key: "novaJournalEntries".to_string(),
///     source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
/// };
/// assert!(error.is_write_failure());
/// assert!(format!("{}", error).contains("novaJournalEntries"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be read.
    #[error("Failed to read '{key}' from storage: {source}")]
    Unreadable {
        /// The storage key being read
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The stored value is not well-formed serialized data.
    #[error("Stored value for '{key}' is not valid JSON: {source}. The data was left untouched so it can be recovered manually.")]
    Malformed {
        /// The storage key holding the bad value
        key: String,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the write (disk full, permissions, backend gone).
    #[error("Failed to write '{key}' to storage: {source}. Your previous data is unchanged; please try again.")]
    Unwritable {
        /// The storage key being written
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The value could not be serialized before writing.
    #[error("Failed to serialize value for '{key}': {source}")]
    Encode {
        /// The storage key being written
        key: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Another process holds the data directory lock.
    #[error("Storage at {path} is currently being written by another process. Please try again.")]
    Locked {
        /// The lock file that could not be acquired
        path: PathBuf,
    },

    /// The key contains characters the backend cannot store.
    #[error("Invalid storage key '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),
}

impl StorageError {
    /// Returns true for failures that happened while writing.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            StorageError::Unwritable { .. }
                | StorageError::Encode { .. }
                | StorageError::Locked { .. }
                | StorageError::InvalidKey(_)
        )
    }
}

/// Represents a date string that is not a canonical `YYYY-MM-DD` key.
///
/// # Examples
///
/// ```
/// use nova::journal::EntryDate;
///
/// let error = "2025-13-01".parse::<EntryDate>().unwrap_err();
/// assert!(format!("{}", error).contains("2025-13-01"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    /// The input is not a valid calendar date in canonical form.
    #[error("Invalid date '{input}': expected a calendar date in YYYY-MM-DD format")]
    Invalid {
        /// The rejected input
        input: String,
    },
}

/// Represents failures of a response generator.
///
/// The reflection session never propagates these to its caller; it logs them
/// and appends a fallback reply instead. They are public so generator
/// implementations outside this crate can report failures precisely.
///
/// # Examples
///
/// ```
/// use nova::errors::GeneratorError;
///
/// let error = GeneratorError::ModelNotFound("llama3.2:3b".to_string());
/// assert!(format!("{}", error).contains("llama3.2:3b"));
/// ```
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Ollama API is not reachable.
    #[error("Ollama API error: {0}. Is Ollama running? Try: ollama serve")]
    Offline(#[source] reqwest::Error),

    /// Requested model not found in Ollama.
    #[error("Model not found: {0}. Try: ollama pull {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the backend.
    #[error("Invalid response from generator: {0}")]
    InvalidResponse(String),

    /// The generator produced only whitespace.
    #[error("Generator returned an empty reply")]
    EmptyReply,

    /// The generator did not finish within the configured bound.
    #[error("Generator did not reply within {0:?}")]
    TimedOut(Duration),

    /// Any other generator-specific failure.
    #[error("Generator failed: {0}")]
    Failed(String),
}

/// Represents all possible errors that can occur in the nova application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use nova::errors::AppError;
///
/// let error = AppError::Config("Data directory path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Data directory path is empty");
/// ```
///
/// Converting from a validation error:
/// ```
/// use nova::errors::{AppError, ValidationError};
///
/// let app_error: AppError = ValidationError::EmptyEntry.into();
/// assert!(matches!(app_error, AppError::Validation(ValidationError::EmptyEntry)));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from terminal or filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any write was attempted.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Errors from the persistence backend.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Malformed date keys.
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Errors from a response generator.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// A background reply task ended abnormally.
    #[error("Reflection session error: {0}")]
    Session(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use nova::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
