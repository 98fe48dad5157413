//! Import reconciliation.
//!
//! An external batch is merged into the log element by element. Each
//! candidate is validated, its derived fields are recomputed, and it is
//! compared field by field against every existing record with the same
//! [`Signature`], including candidates accepted earlier in the same batch.
//! Exact matches are skipped; anything else is appended with a fresh id.

use crate::conflicts::Signature;
use crate::log::EventLog;
use rt_common::{Error, EventId, Result, UpgradeRecord, FORMAT_VERSION};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of one import call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub accepted: usize,
    pub skipped_duplicate: usize,
    pub skipped_invalid: usize,
    /// Ids assigned to the accepted events, in batch order.
    pub accepted_ids: Vec<EventId>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.accepted + self.skipped_duplicate + self.skipped_invalid
    }

    /// True when the batch added nothing. Not an error.
    pub fn nothing_new(&self) -> bool {
        self.accepted == 0
    }
}

/// Parse `payload` as JSON and reconcile it into `log`.
pub fn import_json(log: &mut EventLog, payload: &str) -> Result<ImportReport> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| Error::ImportPayload(format!("invalid JSON: {e}")))?;
    reconcile(log, &value)
}

/// Reconcile an already-parsed batch into `log`.
///
/// A payload that is not an array fails before the log is touched.
/// Elements that fail validation (malformed, or with an unsupported `v`)
/// are counted as invalid and skipped; any other error aborts the batch.
pub fn reconcile(log: &mut EventLog, payload: &Value) -> Result<ImportReport> {
    let items = payload
        .as_array()
        .ok_or_else(|| Error::ImportPayload("expected a JSON array of records".to_string()))?;

    let mut index: HashMap<Signature, Vec<UpgradeRecord>> = HashMap::new();
    for event in log.events() {
        index
            .entry(Signature::of(&event.record))
            .or_default()
            .push(event.to_record());
    }

    let mut report = ImportReport::default();
    for (position, item) in items.iter().enumerate() {
        let record = match candidate(item) {
            Ok(record) => record,
            Err(e) if e.is_validation() => {
                debug!(
                    position,
                    code = e.code(),
                    error = %e,
                    "skipping invalid import record"
                );
                report.skipped_invalid += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let existing = index.entry(Signature::of(&record)).or_default();
        if existing.iter().any(|r| r == &record) {
            debug!(
                position,
                entity = %record.entity,
                level_to = record.level_to,
                "skipping duplicate import record"
            );
            report.skipped_duplicate += 1;
            continue;
        }

        existing.push(record.clone());
        let id = log.append(record)?.id.clone();
        report.accepted += 1;
        report.accepted_ids.push(id);
    }

    info!(
        accepted = report.accepted,
        skipped_duplicate = report.skipped_duplicate,
        skipped_invalid = report.skipped_invalid,
        "import reconciled"
    );
    Ok(report)
}

fn candidate(item: &Value) -> Result<UpgradeRecord> {
    match item.get("v").map(Value::as_u64) {
        Some(Some(v)) if v == u64::from(FORMAT_VERSION) => {}
        Some(Some(v)) => {
            return Err(Error::UnsupportedVersion {
                found: u32::try_from(v).unwrap_or(u32::MAX),
                expected: FORMAT_VERSION,
            })
        }
        Some(None) => {
            return Err(Error::InvalidEvent(format!(
                "record version {} is not an integer",
                item["v"]
            )))
        }
        None => return Err(Error::InvalidEvent("record version missing".to_string())),
    }
    let record: UpgradeRecord = serde_json::from_value(item.clone())
        .map_err(|e| Error::InvalidEvent(format!("malformed record: {e}")))?;
    record.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "v": 1, "ham": "Nibbles", "lvlFrom": 3, "lvlTo": 4,
            "cost": 1500.0, "dHr": 12.5, "roi": 999.0, "perM": 1.0,
            "excluded": false
        })
    }

    #[test]
    fn non_array_payload_is_fatal_and_leaves_log_alone() {
        let mut log = EventLog::new();
        log.append(UpgradeRecord::new("a", 0, 1.0, 1.0)).unwrap();
        let err = reconcile(&mut log, &json!({"v": 1})).unwrap_err();
        assert!(matches!(err, Error::ImportPayload(_)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn unparseable_text_is_payload_error() {
        let mut log = EventLog::new();
        assert!(matches!(
            import_json(&mut log, "[{"),
            Err(Error::ImportPayload(_))
        ));
    }

    #[test]
    fn derived_fields_are_recomputed() {
        let mut log = EventLog::new();
        let report = reconcile(&mut log, &json!([sample()])).unwrap();
        assert_eq!(report.accepted, 1);
        let roi = log.events()[0].record.roi;
        assert!((roi - 12.5 / 1500.0).abs() < 1e-15);
    }

    #[test]
    fn stale_derived_fields_do_not_defeat_dedup() {
        let mut log = EventLog::new();
        log.append(UpgradeRecord::new("Nibbles", 3, 1500.0, 12.5)).unwrap();
        let report = reconcile(&mut log, &json!([sample()])).unwrap();
        assert_eq!(report.accepted, 0);
        assert_eq!(report.skipped_duplicate, 1);
        assert!(report.nothing_new());
    }

    #[test]
    fn duplicates_within_one_batch_collapse() {
        let mut log = EventLog::new();
        let report = reconcile(&mut log, &json!([sample(), sample()])).unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_duplicate, 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn same_signature_different_totals_is_accepted() {
        let mut log = EventLog::new();
        log.append(UpgradeRecord::new("Nibbles", 3, 1500.0, 12.5)).unwrap();
        let mut changed = sample();
        changed["totAfter"] = json!(112.5);
        let report = reconcile(&mut log, &json!([changed])).unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn invalid_elements_are_counted() {
        let mut log = EventLog::new();
        let mut v2 = sample();
        v2["v"] = json!(2);
        let mut gap = sample();
        gap["lvlTo"] = json!(9);
        let batch = json!([v2, gap, "nope", {"v": 1}, {"ham": "x"}, sample()]);
        let report = reconcile(&mut log, &batch).unwrap();
        assert_eq!(report.skipped_invalid, 5);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.total(), 6);
        assert_eq!(report.accepted_ids, vec![log.events()[0].id.clone()]);
    }

    #[test]
    fn candidate_errors_are_validation_errors() {
        let mut v2 = sample();
        v2["v"] = json!(2);
        assert!(matches!(
            candidate(&v2),
            Err(Error::UnsupportedVersion { found: 2, expected: 1 })
        ));
        let mut text_version = sample();
        text_version["v"] = json!("1");
        for item in [v2, text_version, json!("nope"), json!({"v": 1}), json!({"ham": "x"})] {
            assert!(candidate(&item).unwrap_err().is_validation());
        }
    }

    #[test]
    fn long_key_aliases_are_accepted() {
        let mut log = EventLog::new();
        let batch = json!([{
            "v": 1, "entity": "Pip", "levelFrom": 0, "levelTo": 1,
            "cost": 10.0, "gainPerHour": 2.0
        }]);
        assert_eq!(reconcile(&mut log, &batch).unwrap().accepted, 1);
        assert_eq!(log.events()[0].entity(), "Pip");
    }
}
