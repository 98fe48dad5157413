//! JSON and CSV export of canonical records.
//!
//! Storage metadata is stripped; both formats carry the same wire keys as
//! import, so an export can be re-imported losslessly.

use crate::event::UpgradeEvent;
use chrono::{DateTime, Local};
use rt_common::{Result, UpgradeRecord, FORMAT_VERSION};

/// CSV header, in fixed column order.
pub const CSV_COLUMNS: [&str; 10] = [
    "ham",
    "lvlFrom",
    "lvlTo",
    "cost",
    "dHr",
    "totBefore",
    "totAfter",
    "roi",
    "perM",
    "excluded",
];

/// Pretty-printed JSON array of canonical records.
pub fn to_json(events: &[UpgradeEvent]) -> Result<String> {
    let records: Vec<UpgradeRecord> = events.iter().map(UpgradeEvent::to_record).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// CSV with a header row. Absent totals are empty cells.
pub fn to_csv(events: &[UpgradeEvent]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');
    for event in events {
        let r = &event.record;
        let row = [
            escape_field(&r.entity),
            r.level_from.to_string(),
            r.level_to.to_string(),
            r.cost.to_string(),
            r.gain_per_hour.to_string(),
            r.total_before.map(|v| v.to_string()).unwrap_or_default(),
            r.total_after.map(|v| v.to_string()).unwrap_or_default(),
            r.roi.to_string(),
            r.per_million.to_string(),
            r.excluded.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a separator, quote, or line break.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// File name for an export taken at `at`, e.g.
/// `rollertap-logs_v1_2024-05-01_09-30.json`.
pub fn export_file_name(extension: &str, at: DateTime<Local>) -> String {
    format!(
        "rollertap-logs_v{}_{}.{}",
        FORMAT_VERSION,
        at.format("%Y-%m-%d_%H-%M"),
        extension
    )
}
