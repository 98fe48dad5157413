//! Tunables for outlier detection, fit confidence, and input checks.
//!
//! These types match analysis.json. Every field has a default so a partial
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema_version: String,

    /// Trailing window (in events) for rolling z-scores.
    pub outlier_window: usize,

    /// |z| above which an event is presented as a suspected outlier.
    pub outlier_threshold: f64,

    pub confidence: ConfidenceWeights,

    pub totals_tolerance: TotalsTolerance,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            outlier_window: 6,
            outlier_threshold: 2.5,
            confidence: ConfidenceWeights::default(),
            totals_tolerance: TotalsTolerance::default(),
        }
    }
}

/// Weights of the fit confidence heuristic.
///
/// `confidence = points·p + span·s + gain_fit·R²gain + cost_fit·R²cost`
/// where `p` and `s` saturate at `saturation` points / consecutive levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub points: f64,
    pub span: f64,
    pub gain_fit: f64,
    pub cost_fit: f64,
    pub saturation: u32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            points: 0.2,
            span: 0.2,
            gain_fit: 0.3,
            cost_fit: 0.3,
            saturation: 6,
        }
    }
}

impl ConfidenceWeights {
    pub fn total(&self) -> f64 {
        self.points + self.span + self.gain_fit + self.cost_fit
    }
}

/// Allowed disagreement between `total_after - total_before` and the
/// entered gain before a mismatch warning is raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalsTolerance {
    /// Absolute floor.
    pub absolute: f64,
    /// Fraction of the entered gain.
    pub relative: f64,
}

impl Default for TotalsTolerance {
    fn default() -> Self {
        Self {
            absolute: 1.0,
            relative: 0.02,
        }
    }
}

impl TotalsTolerance {
    /// Maximum tolerated deviation for a given gain.
    pub fn allowance(&self, gain_per_hour: f64) -> f64 {
        self.absolute.max(gain_per_hour * self.relative)
    }
}
