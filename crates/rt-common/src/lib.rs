//! RollerTap common types, IDs, and errors.
//!
//! This crate provides foundational types shared across rt-core modules:
//! - Event identity types
//! - The canonical (metadata-free) upgrade record
//! - Format and schema versioning
//! - Common error types

pub mod error;
pub mod id;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use id::EventId;
pub use record::UpgradeRecord;
pub use schema::{FORMAT_VERSION, SCHEMA_VERSION};
