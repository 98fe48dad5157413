//! The tracker facade.
//!
//! Owns the event log, the user's options and the prefill level map, and
//! exposes every operation an embedding UI needs: submit, toggle, delete,
//! import, export, load/save, and the derived views.

use crate::conflicts::{detect_conflicts, present_signatures, ConflictSet, Signature};
use crate::event::{check_totals, EventDraft, TotalsMismatch, UpgradeEvent};
use crate::export;
use crate::fits::{build_entity_fits, fit_entity, EntityFit};
use crate::group::group_by_entity;
use crate::import::{self, ImportReport};
use crate::log::EventLog;
use crate::outliers::{detect_outliers, OutlierInfo};
use crate::store::{load_snapshot, persist_snapshot, AppState, KeyValueStore, Snapshot};
use crate::summary::DatasetSummary;
use rt_common::{EventId, Result};
use rt_config::{AnalysisConfig, Options};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: EventId,
    /// Set when the before/after totals disagree with the entered gain.
    pub totals_warning: Option<TotalsMismatch>,
    /// True when an event with the same signature was already logged.
    pub duplicate: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    log: EventLog,
    options: Options,
    last_levels: BTreeMap<String, u32>,
    config: AnalysisConfig,
}

impl Tracker {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Restore from a store. Persisted records that no longer validate are
    /// dropped with a warning.
    pub fn load(store: &dyn KeyValueStore, config: AnalysisConfig) -> Result<Self> {
        let snapshot = load_snapshot(store)?;
        let (log, rejected) = EventLog::from_records(snapshot.records);
        for err in &rejected {
            warn!(error = %err, "dropping stored record");
        }
        let mut tracker = Self {
            log,
            options: snapshot.options,
            last_levels: BTreeMap::new(),
            config,
        };
        tracker.refresh_levels();
        if tracker.last_levels != snapshot.state.last_levels {
            debug!("stored prefill levels out of date, recomputed from log");
        }
        info!(events = tracker.log.len(), "tracker loaded");
        Ok(tracker)
    }

    /// Persist records, options and prefill state.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let snapshot = Snapshot {
            records: self.log.records(),
            options: self.options.clone(),
            state: AppState {
                last_levels: self.last_levels.clone(),
            },
        };
        persist_snapshot(store, &snapshot)?;
        debug!(events = self.log.len(), "tracker saved");
        Ok(())
    }

    fn refresh_levels(&mut self) {
        self.last_levels = self.log.last_levels();
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn events(&self) -> &[UpgradeEvent] {
        self.log.events()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Parse, validate and append a user submission.
    ///
    /// Duplicates and totals mismatches are reported, not rejected.
    pub fn submit(&mut self, draft: &EventDraft) -> Result<Submission> {
        let record = draft.to_record(&self.options)?;
        let duplicate = present_signatures(self.log.events()).contains(&Signature::of(&record));
        let totals_warning = check_totals(&record, &self.config.totals_tolerance);
        if let Some(mismatch) = &totals_warning {
            warn!(entity = %record.entity, %mismatch, "totals disagree with gain");
        }

        let id = self.log.append(record)?.id.clone();
        self.refresh_levels();
        info!(id = %id, duplicate, "event logged");
        Ok(Submission {
            id,
            totals_warning,
            duplicate,
        })
    }

    /// True when `draft` would duplicate an existing signature. Drafts that
    /// fail validation are never duplicates.
    pub fn is_duplicate(&self, draft: &EventDraft) -> bool {
        draft
            .to_record(&self.options)
            .map(|record| {
                present_signatures(self.log.events()).contains(&Signature::of(&record))
            })
            .unwrap_or(false)
    }

    pub fn toggle_excluded(&mut self, id: &EventId) -> Result<bool> {
        let excluded = self.log.toggle_excluded(id)?;
        self.refresh_levels();
        debug!(id = %id, excluded, "exclusion toggled");
        Ok(excluded)
    }

    pub fn delete(&mut self, id: &EventId) -> Result<UpgradeEvent> {
        let removed = self.log.delete(id)?;
        self.refresh_levels();
        info!(id = %id, "event deleted");
        Ok(removed)
    }

    pub fn import_json(&mut self, payload: &str) -> Result<ImportReport> {
        let report = import::import_json(&mut self.log, payload)?;
        self.refresh_levels();
        Ok(report)
    }

    pub fn import_value(&mut self, payload: &Value) -> Result<ImportReport> {
        let report = import::reconcile(&mut self.log, payload)?;
        self.refresh_levels();
        Ok(report)
    }

    pub fn export_json(&self) -> Result<String> {
        export::to_json(self.log.events())
    }

    pub fn export_csv(&self) -> String {
        export::to_csv(self.log.events())
    }

    pub fn fits(&self) -> Vec<EntityFit> {
        build_entity_fits(self.log.events(), &self.config.confidence)
    }

    pub fn fit_for(&self, entity: &str) -> Option<EntityFit> {
        group_by_entity(self.log.events())
            .into_iter()
            .find(|g| g.entity == entity)
            .map(|g| fit_entity(g.entity, &g.events, &self.config.confidence))
    }

    pub fn outliers(&self) -> HashMap<EventId, OutlierInfo> {
        detect_outliers(self.log.events(), self.config.outlier_window)
    }

    /// Ids of events whose |z| exceeds the configured threshold, in log order.
    pub fn suspected_outliers(&self) -> Vec<EventId> {
        let scores = self.outliers();
        let threshold = self.config.outlier_threshold;
        self.log
            .events()
            .iter()
            .filter(|e| scores.get(&e.id).is_some_and(|s| s.is_suspect(threshold)))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn conflicts(&self) -> ConflictSet {
        detect_conflicts(self.log.events())
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::compute(self.log.events(), &self.last_levels)
    }

    pub fn last_levels(&self) -> &BTreeMap<String, u32> {
        &self.last_levels
    }

    /// Suggested `(level_from, level_to)` for the entity's next upgrade.
    pub fn prefill(&self, entity: &str) -> Option<(u32, u32)> {
        let last = *self.last_levels.get(entity.trim())?;
        Some((last, last.saturating_add(1)))
    }
}
