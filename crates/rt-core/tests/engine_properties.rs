//! Property-based tests for conflict detection, rolling z-scores and fit
//! confidence.

use proptest::prelude::*;
use rt_common::UpgradeRecord;
use rt_config::ConfidenceWeights;
use rt_core::fits::{confidence_score, ConfidenceInputs};
use rt_core::{build_entity_fits, detect_conflicts, detect_outliers, EventLog};

fn record_strategy() -> impl Strategy<Value = UpgradeRecord> {
    (
        prop::sample::select(vec!["Nibbles", "Pip", "Biscuit"]),
        0u32..8,
        prop::sample::select(vec![10.0, 25.0, 100.0, 1_500.0]),
        prop::sample::select(vec![1.0, 2.5, 12.5]),
        any::<bool>(),
    )
        .prop_map(|(entity, from, cost, gain, excluded)| {
            UpgradeRecord::new(entity, from, cost, gain).with_excluded(excluded)
        })
}

fn log_of(records: Vec<UpgradeRecord>) -> EventLog {
    let (log, rejected) = EventLog::from_records(records);
    assert!(rejected.is_empty());
    log
}

fn inputs_strategy() -> impl Strategy<Value = ConfidenceInputs> {
    (
        0usize..20,
        0usize..20,
        prop::option::of(-0.5f64..=1.0),
        prop::option::of(-0.5f64..=1.0),
    )
        .prop_map(|(points, consecutive_run, gain_r2, cost_r2)| ConfidenceInputs {
            points,
            consecutive_run,
            gain_r2,
            cost_r2,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn conflict_detection_is_idempotent(records in prop::collection::vec(record_strategy(), 0..40)) {
        let log = log_of(records);
        let first = detect_conflicts(log.events());
        let second = detect_conflicts(log.events());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn conflict_members_share_a_signature(records in prop::collection::vec(record_strategy(), 0..40)) {
        let log = log_of(records);
        let conflicts = detect_conflicts(log.events());
        for event in log.events() {
            let twins = log
                .events()
                .iter()
                .filter(|other| {
                    other.entity() == event.entity()
                        && other.level_to() == event.level_to()
                        && other.cost() == event.cost()
                        && other.gain_per_hour() == event.gain_per_hour()
                })
                .count();
            prop_assert_eq!(conflicts.contains(&event.id), twins > 1);
        }
    }

    #[test]
    fn every_event_gets_a_score_entry(
        records in prop::collection::vec(record_strategy(), 0..40),
        window in 1usize..10,
    ) {
        let log = log_of(records);
        let scores = detect_outliers(log.events(), window);
        prop_assert_eq!(scores.len(), log.len());
        for info in scores.values() {
            if let Some(z) = info.cost_z {
                prop_assert!(z.is_finite());
            }
        }
    }

    #[test]
    fn confidence_stays_in_unit_interval(inputs in inputs_strategy()) {
        let c = confidence_score(inputs, &ConfidenceWeights::default());
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn confidence_is_monotone(inputs in inputs_strategy(), bump in 1usize..6, r2_bump in 0.0f64..0.5) {
        let w = ConfidenceWeights::default();
        let base = confidence_score(inputs, &w);

        let more_points = ConfidenceInputs { points: inputs.points + bump, ..inputs };
        prop_assert!(confidence_score(more_points, &w) >= base);

        let longer_run = ConfidenceInputs { consecutive_run: inputs.consecutive_run + bump, ..inputs };
        prop_assert!(confidence_score(longer_run, &w) >= base);

        let better_gain = ConfidenceInputs {
            gain_r2: Some(inputs.gain_r2.unwrap_or(0.0).max(0.0) + r2_bump),
            ..inputs
        };
        prop_assert!(confidence_score(better_gain, &w) >= base);
    }

    #[test]
    fn fit_confidence_in_unit_interval(records in prop::collection::vec(record_strategy(), 0..40)) {
        let log = log_of(records);
        for fit in build_entity_fits(log.events(), &ConfidenceWeights::default()) {
            prop_assert!((0.0..=1.0).contains(&fit.confidence));
            prop_assert!(fit.points.windows(2).all(|p| p[0].level <= p[1].level));
        }
    }
}

#[test]
fn doubling_sample_recovers_growth() {
    let log = log_of(vec![
        UpgradeRecord::new("Nibbles", 1, 100.0, 10.0),
        UpgradeRecord::new("Nibbles", 2, 200.0, 10.0),
        UpgradeRecord::new("Nibbles", 3, 400.0, 10.0),
    ]);
    let fits = build_entity_fits(log.events(), &ConfidenceWeights::default());
    let fit = &fits[0];
    let cost = fit.cost_fit.expect("cost fit");
    let gain = fit.gain_fit.expect("gain fit");
    assert!((cost.r - 2.0).abs() < 1e-9);
    assert!((cost.r2 - 1.0).abs() < 1e-9);
    assert!(gain.beta.abs() < 1e-12);
    assert!((gain.alpha - 10.0).abs() < 1e-9);
}
