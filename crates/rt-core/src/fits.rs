//! Per-entity curve fits and the confidence heuristic.
//!
//! For each entity, the included (non-excluded) events are sorted by
//! `level_to` and fitted twice: a geometric model for cost and a straight
//! line for gain per hour. The fits are summarized into a single confidence
//! score in `[0, 1]` that grows with the number of points, the longest run
//! of consecutive levels, and both fits' R².

use crate::event::UpgradeEvent;
use crate::group::{group_by_entity, sorted_by_level};
use rt_config::ConfidenceWeights;
use rt_math::{
    fit_geometric, fit_linear, longest_consecutive_run, mean, GeometricFit, LinearFit,
};
use serde::Serialize;
use std::fmt;

/// Coarse label for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Good,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(confidence: f64) -> Self {
        if confidence >= 0.75 {
            ConfidenceBand::Good
        } else if confidence >= 0.4 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceBand::Good => write!(f, "good"),
            ConfidenceBand::Medium => write!(f, "medium"),
            ConfidenceBand::Low => write!(f, "low"),
        }
    }
}

/// One `(level, cost, gain)` triple that went into a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitPoint {
    pub level: u32,
    pub cost: f64,
    pub gain_per_hour: f64,
}

/// Fit summary for one entity. Recomputed on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityFit {
    pub entity: String,
    /// Highest `level_to` across all of the entity's events, excluded ones
    /// included.
    pub last_level: Option<u32>,
    /// Mean of consecutive cost ratios over included events.
    pub avg_multiplier: Option<f64>,
    pub gain_fit: Option<LinearFit>,
    pub cost_fit: Option<GeometricFit>,
    pub confidence: f64,
    pub band: ConfidenceBand,
    /// Included events in level order.
    pub points: Vec<FitPoint>,
}

impl EntityFit {
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Modeled cost at `level`, if a cost fit exists.
    pub fn predicted_cost(&self, level: u32) -> Option<f64> {
        self.cost_fit.map(|fit| fit.predict(f64::from(level)))
    }

    /// Modeled gain per hour at `level`, if a gain fit exists.
    pub fn predicted_gain(&self, level: u32) -> Option<f64> {
        self.gain_fit.map(|fit| fit.predict(f64::from(level)))
    }
}

/// Consecutive ratios `costs[i] / costs[i - 1]`, skipping zero denominators.
pub fn cost_ratios(costs: &[f64]) -> impl Iterator<Item = f64> + '_ {
    costs
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| pair[1] / pair[0])
}

/// Mean of [`cost_ratios`]; `None` when there are none.
pub fn average_cost_multiplier(costs: &[f64]) -> Option<f64> {
    let ratios: Vec<f64> = cost_ratios(costs).collect();
    mean(&ratios)
}

/// Raw ingredients of the confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfidenceInputs {
    pub points: usize,
    /// Longest run of consecutive distinct levels.
    pub consecutive_run: usize,
    pub gain_r2: Option<f64>,
    pub cost_r2: Option<f64>,
}

/// Weighted confidence, rounded to two decimals and clamped to `[0, 1]`.
///
/// A missing or non-finite R² contributes zero.
pub fn confidence_score(inputs: ConfidenceInputs, weights: &ConfidenceWeights) -> f64 {
    let saturation = f64::from(weights.saturation.max(1));
    let p = (inputs.points as f64 / saturation).min(1.0);
    let span = (inputs.consecutive_run as f64 / saturation).min(1.0);
    let gain = r2_term(inputs.gain_r2);
    let cost = r2_term(inputs.cost_r2);

    let raw = weights.points * p
        + weights.span * span
        + weights.gain_fit * gain
        + weights.cost_fit * cost;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

fn r2_term(r2: Option<f64>) -> f64 {
    match r2 {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Fit one entity's events. `events` may contain excluded events; they only
/// count towards `last_level`.
pub fn fit_entity(
    entity: &str,
    events: &[&UpgradeEvent],
    weights: &ConfidenceWeights,
) -> EntityFit {
    let last_level = events.iter().map(|e| e.level_to()).max();

    let included: Vec<&UpgradeEvent> = events
        .iter()
        .copied()
        .filter(|e| !e.is_excluded())
        .collect();
    let sorted = sorted_by_level(&included);

    let levels: Vec<u32> = sorted.iter().map(|e| e.level_to()).collect();
    let xs: Vec<f64> = levels.iter().map(|&l| f64::from(l)).collect();
    let costs: Vec<f64> = sorted.iter().map(|e| e.cost()).collect();
    let gains: Vec<f64> = sorted.iter().map(|e| e.gain_per_hour()).collect();

    let cost_fit = fit_geometric(&xs, &costs);
    let gain_fit = fit_linear(&xs, &gains);

    let confidence = confidence_score(
        ConfidenceInputs {
            points: sorted.len(),
            consecutive_run: longest_consecutive_run(&levels),
            gain_r2: gain_fit.map(|f| f.r2),
            cost_r2: cost_fit.map(|f| f.r2),
        },
        weights,
    );

    EntityFit {
        entity: entity.to_string(),
        last_level,
        avg_multiplier: average_cost_multiplier(&costs),
        gain_fit,
        cost_fit,
        confidence,
        band: ConfidenceBand::from_score(confidence),
        points: sorted
            .iter()
            .map(|e| FitPoint {
                level: e.level_to(),
                cost: e.cost(),
                gain_per_hour: e.gain_per_hour(),
            })
            .collect(),
    }
}

/// Fit every entity in the log, in order of first appearance.
pub fn build_entity_fits(events: &[UpgradeEvent], weights: &ConfidenceWeights) -> Vec<EntityFit> {
    group_by_entity(events)
        .iter()
        .map(|group| fit_entity(group.entity, &group.events, weights))
        .collect()
}
