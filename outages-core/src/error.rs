//! Error types for outage schedule loading.
//!
//! Compiling a schedule never fails; these errors come from the edges
//! (configuration, calendar files, event payloads).

use thiserror::Error;

/// Errors that can occur while loading configuration or calendar events.
#[derive(Error, Debug)]
pub enum OutageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Recurrence error: {0}")]
    Recurrence(String),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for outage operations.
pub type OutageResult<T> = Result<T, OutageError>;
