//! Duplicate/conflict detection over the event log.
//!
//! Events are keyed by [`Signature`]; every member of a signature shared by
//! two or more events is conflicting. Exclusion does not remove an event
//! from grouping.

use crate::event::UpgradeEvent;
use rt_common::{EventId, UpgradeRecord};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Dedup key `(entity, level_to, cost, gain_per_hour)`.
///
/// Amounts are compared by exact bit pattern, so two costs match only when
/// they are the same `f64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    entity: String,
    level_to: u32,
    cost_bits: u64,
    gain_bits: u64,
}

impl Signature {
    pub fn of(record: &UpgradeRecord) -> Self {
        Self {
            entity: record.entity.clone(),
            level_to: record.level_to,
            cost_bits: canonical_bits(record.cost),
            gain_bits: canonical_bits(record.gain_per_hour),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn level_to(&self) -> u32 {
        self.level_to
    }

    pub fn cost(&self) -> f64 {
        f64::from_bits(self.cost_bits)
    }

    pub fn gain_per_hour(&self) -> f64 {
        f64::from_bits(self.gain_bits)
    }
}

/// Bits of `v` with `-0.0` folded into `0.0`.
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.entity,
            self.level_to,
            self.cost(),
            self.gain_per_hour()
        )
    }
}

/// Result of conflict detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    /// Ids of every event that shares its signature with another event.
    pub ids: HashSet<EventId>,
    /// Signatures with two or more events.
    pub signatures: HashSet<Signature>,
}

impl ConflictSet {
    pub fn contains(&self, id: &EventId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Mark every event whose signature occurs two or more times.
pub fn detect_conflicts(events: &[UpgradeEvent]) -> ConflictSet {
    let mut grouped: HashMap<Signature, Vec<&EventId>> = HashMap::new();
    for event in events {
        grouped
            .entry(Signature::of(&event.record))
            .or_default()
            .push(&event.id);
    }

    let mut conflicts = ConflictSet::default();
    for (signature, ids) in grouped {
        if ids.len() > 1 {
            conflicts.ids.extend(ids.into_iter().cloned());
            conflicts.signatures.insert(signature);
        }
    }
    conflicts
}

/// Every signature present in the log, for pre-submit duplicate warnings.
pub fn present_signatures(events: &[UpgradeEvent]) -> HashSet<Signature> {
    events.iter().map(|e| Signature::of(&e.record)).collect()
}
