//! Event identity types.
//!
//! Ids are storage-layer metadata: assigned once when an event enters the
//! log, never reused, and stripped before export or comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a logged upgrade event.
///
/// Format: `evt-<uuid v4>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Generate a fresh event ID.
    pub fn new() -> Self {
        EventId(format!("evt-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
