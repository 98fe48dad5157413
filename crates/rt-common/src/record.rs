//! The canonical upgrade record.
//!
//! This is the persisted/exported shape of one upgrade event with storage
//! metadata (id, creation time) stripped. Wire keys match the files written
//! by earlier RollerTap releases (`ham`, `lvlTo`, `dHr`, ...); the long
//! names are accepted as aliases on input.

use crate::error::{Error, Result};
use crate::schema::FORMAT_VERSION;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Multiplier applied to ROI for the per-million figure.
pub const PER_MILLION: f64 = 1_000_000.0;

/// One upgrade transaction for an entity, without storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpgradeRecord {
    /// Record format version; only [`FORMAT_VERSION`] is accepted.
    pub v: u32,

    /// Entity (hamster) name.
    #[serde(rename = "ham", alias = "entity")]
    pub entity: String,

    #[serde(rename = "lvlFrom", alias = "levelFrom")]
    pub level_from: u32,

    #[serde(rename = "lvlTo", alias = "levelTo")]
    pub level_to: u32,

    /// Price paid for the upgrade.
    pub cost: f64,

    /// Rate-of-gain delta produced by the upgrade.
    #[serde(rename = "dHr", alias = "gainPerHour")]
    pub gain_per_hour: f64,

    #[serde(
        rename = "totBefore",
        alias = "totalBefore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_before: Option<f64>,

    #[serde(
        rename = "totAfter",
        alias = "totalAfter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_after: Option<f64>,

    /// Derived: `gain_per_hour / cost`.
    #[serde(default)]
    pub roi: f64,

    /// Derived: `roi * 1_000_000`.
    #[serde(rename = "perM", alias = "perMillion", default)]
    pub per_million: f64,

    #[serde(default)]
    pub excluded: bool,
}

impl UpgradeRecord {
    /// Build a record for `entity` going `level_from -> level_from + 1`.
    ///
    /// Derived fields are computed; nothing is validated.
    pub fn new(entity: impl Into<String>, level_from: u32, cost: f64, gain_per_hour: f64) -> Self {
        let mut record = Self {
            v: FORMAT_VERSION,
            entity: entity.into(),
            level_from,
            level_to: level_from.saturating_add(1),
            cost,
            gain_per_hour,
            total_before: None,
            total_after: None,
            roi: 0.0,
            per_million: 0.0,
            excluded: false,
        };
        record.recompute_derived();
        record
    }

    /// Attach the informational before/after totals.
    pub fn with_totals(mut self, before: Option<f64>, after: Option<f64>) -> Self {
        self.total_before = before;
        self.total_after = after;
        self
    }

    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// Recompute `roi` and `per_million` from cost and gain.
    ///
    /// Externally supplied derived values are never trusted.
    pub fn recompute_derived(&mut self) {
        self.roi = self.gain_per_hour / self.cost;
        self.per_million = self.roi * PER_MILLION;
    }

    /// Check the record's shape and value invariants.
    pub fn validate(&self) -> Result<()> {
        if self.v != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.v,
                expected: FORMAT_VERSION,
            });
        }
        if self.entity.trim().is_empty() {
            return Err(Error::InvalidEvent("entity name is required".to_string()));
        }
        if self.level_to < 1 {
            return Err(Error::InvalidEvent("level_to must be at least 1".to_string()));
        }
        if self.level_from.checked_add(1) != Some(self.level_to) {
            return Err(Error::InvalidEvent(format!(
                "level_to ({}) must be level_from ({}) + 1",
                self.level_to, self.level_from
            )));
        }
        if !self.cost.is_finite() || self.cost <= 0.0 {
            return Err(Error::InvalidEvent(format!(
                "cost must be greater than zero (got {})",
                self.cost
            )));
        }
        if !self.gain_per_hour.is_finite() || self.gain_per_hour <= 0.0 {
            return Err(Error::InvalidEvent(format!(
                "gain per hour must be greater than zero (got {})",
                self.gain_per_hour
            )));
        }
        Ok(())
    }

    /// Validate and return the record with derived fields recomputed.
    pub fn normalized(mut self) -> Result<Self> {
        self.validate()?;
        self.recompute_derived();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_derived() {
        let r = UpgradeRecord::new("Nibbles", 3, 200.0, 10.0);
        assert_eq!(r.level_to, 4);
        assert!((r.roi - 0.05).abs() < 1e-12);
        assert!((r.per_million - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_level_gap() {
        let mut r = UpgradeRecord::new("Nibbles", 3, 200.0, 10.0);
        r.level_to = 5;
        assert!(matches!(r.validate(), Err(Error::InvalidEvent(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        assert!(UpgradeRecord::new("a", 0, 0.0, 1.0).validate().is_err());
        assert!(UpgradeRecord::new("a", 0, 1.0, -1.0).validate().is_err());
        assert!(UpgradeRecord::new("a", 0, f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_entity_and_version() {
        assert!(UpgradeRecord::new("  ", 0, 1.0, 1.0).validate().is_err());
        let mut r = UpgradeRecord::new("a", 0, 1.0, 1.0);
        r.v = 2;
        assert!(matches!(
            r.validate(),
            Err(Error::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_wire_keys() {
        let r = UpgradeRecord::new("Nibbles", 1, 100.0, 10.0).with_totals(Some(5.0), None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["ham"], "Nibbles");
        assert_eq!(json["lvlFrom"], 1);
        assert_eq!(json["lvlTo"], 2);
        assert_eq!(json["dHr"], 10.0);
        assert_eq!(json["totBefore"], 5.0);
        assert!(json.get("totAfter").is_none());
        assert_eq!(json["excluded"], false);
    }

    #[test]
    fn test_long_name_aliases() {
        let json = r#"{"v":1,"entity":"Nibbles","levelFrom":1,"levelTo":2,
            "cost":100,"gainPerHour":10}"#;
        let r: UpgradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.entity, "Nibbles");
        assert_eq!(r.gain_per_hour, 10.0);
        assert!(!r.excluded);
        let r = r.normalized().unwrap();
        assert!((r.roi - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_overwrites_supplied_roi() {
        let mut r = UpgradeRecord::new("a", 0, 100.0, 10.0);
        r.roi = 99.0;
        r.per_million = 1.0;
        let r = r.normalized().unwrap();
        assert!((r.roi - 0.1).abs() < 1e-12);
        assert!((r.per_million - 100_000.0).abs() < 1e-6);
    }
}
