//! Per-entity grouping of events.

use crate::event::UpgradeEvent;
use std::collections::HashMap;

/// Events belonging to one entity, in log order.
#[derive(Debug, Clone)]
pub struct EntityGroup<'a> {
    pub entity: &'a str,
    pub events: Vec<&'a UpgradeEvent>,
}

/// Group events by entity in one pass.
///
/// Groups appear in order of each entity's first event.
pub fn group_by_entity(events: &[UpgradeEvent]) -> Vec<EntityGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<EntityGroup<'_>> = Vec::new();
    for event in events {
        let slot = *index.entry(event.entity()).or_insert_with(|| {
            groups.push(EntityGroup {
                entity: event.entity(),
                events: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].events.push(event);
    }
    groups
}

/// Sort events ascending by `level_to`, keeping log order among ties.
pub fn sorted_by_level<'a>(events: &[&'a UpgradeEvent]) -> Vec<&'a UpgradeEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.level_to());
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::EventLog;
    use rt_common::UpgradeRecord;

    #[test]
    fn groups_preserve_discovery_order() {
        let mut log = EventLog::new();
        for (entity, lvl) in [("b", 0), ("a", 0), ("b", 1), ("c", 0), ("a", 1)] {
            log.append(UpgradeRecord::new(entity, lvl, 10.0, 1.0)).unwrap();
        }
        let groups = group_by_entity(log.events());
        let names: Vec<_> = groups.iter().map(|g| g.entity).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(groups[0].events.len(), 2);
        assert_eq!(groups[2].events.len(), 1);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut log = EventLog::new();
        log.append(UpgradeRecord::new("a", 3, 1.0, 1.0)).unwrap();
        log.append(UpgradeRecord::new("a", 1, 2.0, 1.0)).unwrap();
        log.append(UpgradeRecord::new("a", 1, 3.0, 1.0)).unwrap();
        let refs: Vec<_> = log.events().iter().collect();
        let sorted = sorted_by_level(&refs);
        let costs: Vec<_> = sorted.iter().map(|e| e.cost()).collect();
        assert_eq!(costs, vec![2.0, 3.0, 1.0]);
    }
}
