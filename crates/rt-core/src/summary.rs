//! Dataset-level summary.

use crate::event::UpgradeEvent;
use crate::fits::cost_ratios;
use crate::group::{group_by_entity, sorted_by_level};
use rt_math::mean;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Headline numbers for the whole log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// All events, excluded ones included.
    pub total_entries: usize,
    /// Entities seen in the log or in the prefill map, sorted.
    pub entities: Vec<String>,
    /// Mean consecutive cost ratio pooled over every entity's included
    /// events.
    pub avg_cost_multiplier: Option<f64>,
}

impl DatasetSummary {
    pub fn compute(events: &[UpgradeEvent], last_levels: &BTreeMap<String, u32>) -> Self {
        let mut entities: BTreeSet<String> = last_levels.keys().cloned().collect();
        let mut ratios = Vec::new();

        for group in group_by_entity(events) {
            entities.insert(group.entity.to_string());
            let included: Vec<&UpgradeEvent> = group
                .events
                .iter()
                .copied()
                .filter(|e| !e.is_excluded())
                .collect();
            let costs: Vec<f64> = sorted_by_level(&included)
                .iter()
                .map(|e| e.cost())
                .collect();
            ratios.extend(cost_ratios(&costs));
        }

        Self {
            total_entries: events.len(),
            entities: entities.into_iter().collect(),
            avg_cost_multiplier: mean(&ratios),
        }
    }

    pub fn tracked_entities(&self) -> usize {
        self.entities.len()
    }
}
