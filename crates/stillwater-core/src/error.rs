//! Core error types for stillwater-core.
//!
//! The timer engine has its own small taxonomy ([`TimerError`],
//! [`PatternError`]); storage, configuration and preset validation errors
//! belong to the collaborators and are folded into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerState;

/// Core error type for stillwater-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer engine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the timer engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Operation invoked outside the state it is legal in.
    #[error("cannot {operation} while timer is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: TimerState,
    },

    /// The pattern handed to `start()` is not runnable.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),
}

/// Reasons a pattern cannot be started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("total duration must be at least one second")]
    ZeroTotalDuration,

    #[error("phase {index} has a zero duration")]
    ZeroPhaseDuration { index: usize },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Requested row does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for user-supplied presets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text field empty or too long
    #[error("'{field}' must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    /// Numeric field below its minimum
    #[error("'{field}' must be at least {min}")]
    TooSmall { field: &'static str, min: u32 },

    /// Phase at `index` is malformed
    #[error("phase {index}: {message}")]
    Phase { index: usize, message: String },

    /// Unknown enum name
    #[error("Invalid value for '{field}': {value}")]
    UnknownVariant { field: &'static str, value: String },

    /// Stored phase list could not be decoded
    #[error("malformed phase list: {0}")]
    MalformedPhases(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
