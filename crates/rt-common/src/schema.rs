//! Format versioning and JSON schema export.

use crate::record::UpgradeRecord;

/// Version tag (`v`) carried by every persisted/exported upgrade record.
pub const FORMAT_VERSION: u32 = 1;

/// Current schema version for JSON outputs.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check if a schema version is compatible with current.
pub fn is_compatible(version: &str) -> bool {
    let current_major = SCHEMA_VERSION
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    let other_major = version
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    current_major == other_major
}

/// JSON schema describing one exported record.
pub fn record_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(UpgradeRecord);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}
