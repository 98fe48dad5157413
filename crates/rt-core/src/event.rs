//! Logged upgrade events and user submissions.
//!
//! An [`UpgradeEvent`] is a canonical [`UpgradeRecord`] plus the storage
//! metadata assigned when it entered the log. An [`EventDraft`] is raw form
//! input that has not been parsed or validated yet.

use crate::parse::parse_amount;
use chrono::{DateTime, Utc};
use rt_common::{Error, EventId, Result, UpgradeRecord};
use rt_config::{Options, TotalsTolerance};
use serde::{Deserialize, Serialize};

/// One event in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEvent {
    pub id: EventId,
    /// Logical creation time; non-decreasing in insertion order.
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: UpgradeRecord,
}

impl UpgradeEvent {
    pub fn entity(&self) -> &str {
        &self.record.entity
    }

    pub fn level_to(&self) -> u32 {
        self.record.level_to
    }

    pub fn cost(&self) -> f64 {
        self.record.cost
    }

    pub fn gain_per_hour(&self) -> f64 {
        self.record.gain_per_hour
    }

    pub fn is_excluded(&self) -> bool {
        self.record.excluded
    }

    /// The canonical record with metadata stripped.
    pub fn to_record(&self) -> UpgradeRecord {
        self.record.clone()
    }
}

/// Unparsed user input for a new upgrade event.
///
/// Amount fields are strings so k/m/b shorthand can be honored according to
/// the user's [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub entity: String,
    /// Defaults to `level_to - 1` when absent.
    pub level_from: Option<i64>,
    pub level_to: i64,
    pub cost: String,
    pub gain_per_hour: String,
    pub total_before: Option<String>,
    pub total_after: Option<String>,
}

impl EventDraft {
    /// Parse and validate into a canonical record.
    pub fn to_record(&self, options: &Options) -> Result<UpgradeRecord> {
        let entity = self.entity.trim();
        if entity.is_empty() {
            return Err(Error::InvalidEvent("entity name is required".to_string()));
        }

        let level_to = self.level_to;
        let level_from = self.level_from.unwrap_or(level_to.saturating_sub(1));
        if level_to < 1 || level_from < 0 {
            return Err(Error::InvalidEvent(
                "levels must be non-negative and level_to at least 1".to_string(),
            ));
        }
        if level_to != level_from.saturating_add(1) {
            return Err(Error::InvalidEvent(
                "level_to must be level_from + 1".to_string(),
            ));
        }
        let level_from = u32::try_from(level_from)
            .map_err(|_| Error::InvalidEvent(format!("level {} out of range", level_from)))?;

        let cost = parse_amount(&self.cost, options.kmb_input)
            .filter(|c| *c > 0.0)
            .ok_or_else(|| Error::InvalidEvent("cost must be greater than zero".to_string()))?;
        let gain = parse_amount(&self.gain_per_hour, options.kmb_input)
            .filter(|g| *g > 0.0)
            .ok_or_else(|| {
                Error::InvalidEvent("gain per hour must be greater than zero".to_string())
            })?;

        let total = |raw: &Option<String>| {
            raw.as_deref()
                .filter(|s| !s.trim().is_empty())
                .and_then(|s| parse_amount(s, options.kmb_input))
        };

        UpgradeRecord::new(entity, level_from, cost, gain)
            .with_totals(total(&self.total_before), total(&self.total_after))
            .normalized()
    }
}

/// Disagreement between the entered gain and the before/after totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalsMismatch {
    /// `total_after - total_before`.
    pub delta: f64,
    pub gain_per_hour: f64,
}

impl std::fmt::Display for TotalsMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "totals mismatch (delta={} vs input {})",
            self.delta, self.gain_per_hour
        )
    }
}

/// Cross-check the informational totals against the gain.
///
/// Only applies when both totals are present; they never feed the fits.
pub fn check_totals(record: &UpgradeRecord, tolerance: &TotalsTolerance) -> Option<TotalsMismatch> {
    let (before, after) = (record.total_before?, record.total_after?);
    if !before.is_finite() || !after.is_finite() {
        return None;
    }
    let delta = after - before;
    let gain = record.gain_per_hour;
    if (delta - gain).abs() > tolerance.allowance(gain) {
        Some(TotalsMismatch {
            delta,
            gain_per_hour: gain,
        })
    } else {
        None
    }
}
