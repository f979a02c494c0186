//! Error types for the timetable subsystem.

use thiserror::Error;

/// Errors that can occur while composing or persisting a timetable.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The backing key-value store failed to read or write
    #[error("Store error: {message}")]
    Store { message: String },

    /// A value could not be serialized or deserialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The configuration file is missing fields or malformed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A newer batch for the same source has already been merged
    #[error("Stale batch for '{source_label}': ticket {ticket} superseded by {latest}")]
    StaleBatch {
        source_label: String,
        ticket: u64,
        latest: u64,
    },

    /// The ticket was never issued for this source, or was already used
    #[error("Unknown batch ticket {ticket} for '{source_label}'")]
    UnknownTicket { source_label: String, ticket: u64 },

    /// Every course id above the baseline has been handed out
    #[error("Course id space exhausted: {needed} new ids requested")]
    IdSpaceExhausted { needed: usize },

    /// No saved plan carries this id
    #[error("No saved plan with id {id}")]
    PlanNotFound { id: String },

    /// No course in the catalog carries this id
    #[error("No course with id {id}")]
    CourseNotFound { id: u32 },

    /// Filesystem access failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl TimetableError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TimetableError::Store { .. } | TimetableError::Io { .. }
        )
    }

    /// Returns true if the caller referenced something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TimetableError::PlanNotFound { .. } | TimetableError::CourseNotFound { .. }
        )
    }
}

impl From<rusqlite::Error> for TimetableError {
    fn from(err: rusqlite::Error) -> Self {
        TimetableError::Store {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for TimetableError {
    fn from(err: std::io::Error) -> Self {
        TimetableError::Io {
            message: err.to_string(),
        }
    }
}
