//! The append-only upgrade event log.
//!
//! The log is the system of record. Events enter via [`EventLog::append`],
//! change only through [`EventLog::toggle_excluded`], and leave only through
//! [`EventLog::delete`]. Ids are never reused.

use crate::event::UpgradeEvent;
use chrono::{DateTime, Utc};
use rt_common::{Error, EventId, Result, UpgradeRecord};
use std::collections::BTreeMap;

/// Ordered collection of logged events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<UpgradeEvent>,
    last_created: Option<DateTime<Utc>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted canonical records.
    ///
    /// Fresh ids and creation times are assigned in slice order. Records that
    /// fail validation are dropped and returned as errors alongside the log.
    pub fn from_records(records: Vec<UpgradeRecord>) -> (Self, Vec<Error>) {
        let mut log = Self::new();
        let mut rejected = Vec::new();
        for record in records {
            if let Err(err) = log.append(record) {
                rejected.push(err);
            }
        }
        (log, rejected)
    }

    /// Validate `record`, recompute its derived fields, and append it.
    pub fn append(&mut self, record: UpgradeRecord) -> Result<&UpgradeEvent> {
        let record = record.normalized()?;
        let event = UpgradeEvent {
            id: EventId::new(),
            created_at: self.next_timestamp(),
            record,
        };
        let idx = self.events.len();
        self.events.push(event);
        Ok(&self.events[idx])
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        self.last_created = Some(at);
        at
    }

    /// Flip the `excluded` flag of an event, returning the new value.
    pub fn toggle_excluded(&mut self, id: &EventId) -> Result<bool> {
        let event = self
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| Error::EventNotFound { id: id.to_string() })?;
        event.record.excluded = !event.record.excluded;
        Ok(event.record.excluded)
    }

    /// Remove an event permanently.
    pub fn delete(&mut self, id: &EventId) -> Result<UpgradeEvent> {
        let idx = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| Error::EventNotFound { id: id.to_string() })?;
        Ok(self.events.remove(idx))
    }

    pub fn get(&self, id: &EventId) -> Option<&UpgradeEvent> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn events(&self) -> &[UpgradeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Canonical records in log order, metadata stripped.
    pub fn records(&self) -> Vec<UpgradeRecord> {
        self.events.iter().map(UpgradeEvent::to_record).collect()
    }

    /// Highest `level_to` per entity over non-excluded events.
    ///
    /// Used to prefill the next submission for an entity.
    pub fn last_levels(&self) -> BTreeMap<String, u32> {
        let mut levels: BTreeMap<String, u32> = BTreeMap::new();
        for event in self.events.iter().filter(|e| !e.is_excluded()) {
            let entry = levels.entry(event.entity().to_string()).or_insert(0);
            *entry = (*entry).max(event.level_to());
        }
        levels
    }
}
