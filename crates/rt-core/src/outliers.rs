//! Rolling z-score outlier detection.
//!
//! Per entity, events are sorted by `level_to` and each event is scored
//! against the trailing window that ends at (and includes) it. The detector
//! only reports signed z-scores; flagging is left to
//! [`OutlierInfo::is_suspect`] with a caller-chosen threshold.

use crate::event::UpgradeEvent;
use crate::group::{group_by_entity, sorted_by_level};
use rt_common::EventId;
use rt_math::z_score;
use serde::Serialize;
use std::collections::HashMap;

/// Default trailing window size.
pub const DEFAULT_WINDOW: usize = 6;

/// Z-scores of one event within its trailing window.
///
/// A score is `None` when the window has fewer than two points or no spread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutlierInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_z: Option<f64>,
}

impl OutlierInfo {
    /// True when either score's magnitude exceeds `threshold`.
    pub fn is_suspect(&self, threshold: f64) -> bool {
        let over = |z: Option<f64>| z.is_some_and(|z| z.abs() > threshold);
        over(self.cost_z) || over(self.gain_z)
    }
}

/// Rolling z-scores for one entity's events.
///
/// `window` values below 1 are treated as 1, which yields no scores.
pub fn rolling_z_scores(
    events: &[&UpgradeEvent],
    window: usize,
) -> HashMap<EventId, OutlierInfo> {
    let window = window.max(1);
    let sorted = sorted_by_level(events);
    let costs: Vec<f64> = sorted.iter().map(|e| e.cost()).collect();
    let gains: Vec<f64> = sorted.iter().map(|e| e.gain_per_hour()).collect();

    let mut scores = HashMap::with_capacity(sorted.len());
    for (i, event) in sorted.iter().enumerate() {
        let start = (i + 1).saturating_sub(window);
        scores.insert(
            event.id.clone(),
            OutlierInfo {
                cost_z: z_score(&costs[start..=i], costs[i]),
                gain_z: z_score(&gains[start..=i], gains[i]),
            },
        );
    }
    scores
}

/// Rolling z-scores for every entity in the log, excluded events included.
pub fn detect_outliers(events: &[UpgradeEvent], window: usize) -> HashMap<EventId, OutlierInfo> {
    let mut all = HashMap::with_capacity(events.len());
    for group in group_by_entity(events) {
        all.extend(rolling_z_scores(&group.events, window));
    }
    all
}
