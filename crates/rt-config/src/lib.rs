//! RollerTap configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for analysis.json and persisted user options
//! - Config resolution (explicit path → env → XDG → defaults)
//! - Semantic validation

pub mod analysis;
pub mod options;
pub mod resolve;
pub mod validate;

pub use analysis::{AnalysisConfig, ConfidenceWeights, TotalsTolerance};
pub use options::Options;
pub use resolve::{load_analysis, resolve_config, ConfigPaths, ConfigSource};
pub use validate::{validate_analysis, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
