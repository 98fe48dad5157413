//! Error types for RollerTap.

use thiserror::Error;

/// Result type alias for RollerTap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for RollerTap.
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (10-19)
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("unsupported record format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    // Import errors (20-29)
    #[error("import payload rejected: {0}")]
    ImportPayload(String),

    // Event log errors (30-39)
    #[error("event {id} not found")]
    EventNotFound { id: String },

    // Configuration errors (40-49)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Storage errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidEvent(_) => 10,
            Error::UnsupportedVersion { .. } => 11,
            Error::ImportPayload(_) => 20,
            Error::EventNotFound { .. } => 30,
            Error::InvalidConfig(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Store(_) => 62,
        }
    }

    /// True for per-record validation failures, which batch operations skip
    /// rather than abort on.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidEvent(_) | Error::UnsupportedVersion { .. })
    }
}
