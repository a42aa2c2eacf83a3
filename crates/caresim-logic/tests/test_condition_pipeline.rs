//! Integration tests for the full condition pipeline.
//!
//! Exercises: catalog → chart seeding → per-tick assessment → overflow
//! escalation → monitoring snapshots, over multi-tick sequences.

use caresim_logic::assessment::{assess, Assessment};
use caresim_logic::catalog::{ConditionCatalog, ConditionTemplate, Progression};
use caresim_logic::causality::{CausalType, OutcomeSet};
use caresim_logic::chart::{Clock, ConditionChart, PriorCondition};
use caresim_logic::condition::DurationClass;
use caresim_logic::progression::{FixedProgression, ProgressionModel, StandardProgression};

// ── Helpers ────────────────────────────────────────────────────────────

struct FixedClock(f32);

impl Clock for FixedClock {
    fn age(&self, birth_year: i32) -> f32 {
        self.0 - birth_year as f32
    }
}

fn clock() -> FixedClock {
    FixedClock(2026.0)
}

fn template(
    label: &str,
    ty: CausalType,
    duration: DurationClass,
    rate: f32,
) -> ConditionTemplate {
    ConditionTemplate {
        label: label.to_string(),
        causal_type: ty,
        duration,
        progression: Progression { rate, weight: 0.8 },
    }
}

fn full_catalog() -> ConditionCatalog {
    ConditionCatalog::from_templates(vec![
        template(
            "stress",
            CausalType::Behavioral,
            DurationClass::Temporary,
            -0.004,
        ),
        template(
            "fatigue",
            CausalType::Behavioral,
            DurationClass::Chronic,
            0.002,
        ),
        template(
            "addiction",
            CausalType::Dependent,
            DurationClass::Permanent,
            0.003,
        ),
        template(
            "isolation",
            CausalType::Social,
            DurationClass::Chronic,
            0.001,
        ),
    ])
    .expect("catalog builds")
}

fn seeded_chart(catalog_priors: &[(&str, f32)]) -> ConditionChart {
    let catalog = full_catalog();
    let priors: Vec<PriorCondition> = catalog_priors
        .iter()
        .map(|(label, weight)| PriorCondition {
            template: catalog.get(label).expect("known label").clone(),
            weight: *weight,
        })
        .collect();
    ConditionChart::new(1955, &priors)
}

fn tick(
    chart: &mut ConditionChart,
    model: &dyn ProgressionModel,
    positive: &OutcomeSet,
    negative: &OutcomeSet,
) -> Assessment {
    assess(chart, &full_catalog(), model, &clock(), positive, negative)
}

fn outcome(ty: CausalType, magnitude: f32) -> OutcomeSet {
    OutcomeSet::from_pairs(&[(ty, magnitude)]).expect("valid outcome")
}

// ── Core scenarios ─────────────────────────────────────────────────────

#[test]
fn scenario_temporary_improves_or_holds() {
    let mut chart = seeded_chart(&[("stress", 0.4)]);
    let positive = outcome(CausalType::Behavioral, 0.5);

    let report = tick(
        &mut chart,
        &FixedProgression(0.0),
        &positive,
        &OutcomeSet::empty(),
    );

    assert!(report.events.is_empty());
    // 0.4 − 0.5 drops to or below zero: the condition is gone.
    assert!(!chart.contains("stress"));
}

#[test]
fn scenario_permanent_overflow_clamps_and_spills() {
    let mut chart = seeded_chart(&[("addiction", 0.9)]);
    let negative = outcome(CausalType::Dependent, 0.3);

    let report = tick(
        &mut chart,
        &FixedProgression(0.0),
        &OutcomeSet::empty(),
        &negative,
    );

    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].causal_type, CausalType::Dependent);
    assert!((report.events[0].weight - 0.2).abs() < 1e-6);
    assert!((chart.get("addiction").unwrap().weight - 1.0).abs() < f32::EPSILON);
}

#[test]
fn scenario_chronic_natural_drift() {
    let mut chart = seeded_chart(&[("fatigue", 0.5)]);

    tick(
        &mut chart,
        &FixedProgression(0.1),
        &OutcomeSet::empty(),
        &OutcomeSet::empty(),
    );

    let fatigue = chart.get("fatigue").unwrap();
    assert!((fatigue.weight - 0.6).abs() < 1e-6);
    assert_eq!(fatigue.duration, DurationClass::Chronic);
}

#[test]
fn scenario_unknown_label_surfaced_not_fatal() {
    let stray = template(
        "phantom_pain",
        CausalType::Physical,
        DurationClass::Chronic,
        0.001,
    );
    let catalog = full_catalog();
    let mut chart = ConditionChart::new(
        1955,
        &[
            PriorCondition {
                template: stray,
                weight: 0.3,
            },
            PriorCondition {
                template: catalog.get("fatigue").unwrap().clone(),
                weight: 0.5,
            },
        ],
    );

    let report = assess(
        &mut chart,
        &catalog,
        &FixedProgression(0.1),
        &clock(),
        &OutcomeSet::empty(),
        &OutcomeSet::empty(),
    );

    assert_eq!(report.unresolved, vec!["phantom_pain".to_string()]);
    assert!((chart.get("phantom_pain").unwrap().weight - 0.3).abs() < f32::EPSILON);
    assert!((chart.get("fatigue").unwrap().weight - 0.6).abs() < 1e-6);
}

// ── Properties over tick sequences ─────────────────────────────────────

#[test]
fn duration_rank_never_decreases() {
    let mut chart = seeded_chart(&[("fatigue", 0.4), ("addiction", 0.5)]);
    let model = StandardProgression::default();
    let negative = outcome(CausalType::Behavioral, 0.25);

    let mut last_ranks: Vec<(String, u8)> = chart
        .snapshot()
        .iter()
        .map(|c| (c.label.clone(), c.duration.rank()))
        .collect();

    for _ in 0..50 {
        tick(&mut chart, &model, &OutcomeSet::empty(), &negative);
        for instance in chart.snapshot() {
            if let Some((_, previous)) = last_ranks.iter().find(|(l, _)| *l == instance.label) {
                assert!(
                    instance.duration.rank() >= *previous,
                    "{} regressed from rank {} to {}",
                    instance.label,
                    previous,
                    instance.duration.rank()
                );
            }
        }
        last_ranks = chart
            .snapshot()
            .iter()
            .map(|c| (c.label.clone(), c.duration.rank()))
            .collect();
    }
}

#[test]
fn permanent_weight_never_regresses() {
    let mut chart = seeded_chart(&[("addiction", 0.3)]);
    let model = StandardProgression::default();
    let positive = outcome(CausalType::Dependent, 0.2);

    let mut previous = chart.get("addiction").unwrap().weight;
    for _ in 0..50 {
        tick(&mut chart, &model, &positive, &OutcomeSet::empty());
        let current = chart.get("addiction").unwrap().weight;
        assert!(
            current >= previous - f32::EPSILON,
            "permanent weight fell from {} to {}",
            previous,
            current
        );
        previous = current;
    }
}

#[test]
fn temporary_weight_never_escalates() {
    let mut chart = seeded_chart(&[("stress", 0.8)]);
    let model = StandardProgression::default();
    let negative = outcome(CausalType::Behavioral, 0.2);

    let mut previous = chart.get("stress").unwrap().weight;
    for _ in 0..50 {
        tick(&mut chart, &model, &OutcomeSet::empty(), &negative);
        match chart.get("stress") {
            Some(instance) => {
                assert!(instance.weight <= previous + f32::EPSILON);
                previous = instance.weight;
            }
            None => return, // resolved and removed, which is also legal
        }
    }
}

#[test]
fn temporary_removed_after_reaching_zero() {
    let mut chart = seeded_chart(&[("stress", 0.2)]);
    let positive = outcome(CausalType::Behavioral, 0.3);

    tick(
        &mut chart,
        &FixedProgression(0.0),
        &positive,
        &OutcomeSet::empty(),
    );

    assert!(chart.snapshot().iter().all(|c| c.label != "stress"));
}

#[test]
fn overflow_conserves_severity() {
    for start in [0.6_f32, 0.75, 0.9, 0.99] {
        let mut chart = seeded_chart(&[("fatigue", start)]);
        let delta = 0.4_f32;
        let negative = outcome(CausalType::Behavioral, delta);

        let report = tick(
            &mut chart,
            &FixedProgression(0.0),
            &OutcomeSet::empty(),
            &negative,
        );

        let expected_overflow = start + delta - 1.0;
        if expected_overflow > 0.0 {
            assert_eq!(report.events.len(), 1);
            assert!(
                (report.events[0].weight - expected_overflow).abs() < 1e-5,
                "start {} expected overflow {}, got {}",
                start,
                expected_overflow,
                report.events[0].weight
            );
            assert!((chart.get("fatigue").unwrap().weight - 1.0).abs() < f32::EPSILON);
        } else {
            assert!(report.events.is_empty());
        }
    }
}

#[test]
fn catalog_lookup_idempotent() {
    let catalog = full_catalog();
    for label in ["stress", "fatigue", "addiction", "isolation"] {
        let first = catalog.get(label).unwrap().clone();
        let second = catalog.get(label).unwrap().clone();
        assert_eq!(first, second);
    }
}

// ── Feedback loop ──────────────────────────────────────────────────────

#[test]
fn emerging_events_feed_back_as_future_harm() {
    let mut chart = seeded_chart(&[("fatigue", 0.9), ("isolation", 0.2)]);

    // First tick: fatigue overflows under a heavy behavioral harm.
    let report = tick(
        &mut chart,
        &FixedProgression(0.0),
        &OutcomeSet::empty(),
        &outcome(CausalType::Behavioral, 0.4),
    );
    assert_eq!(report.events.len(), 1);

    // The caller routes the spill back as a harmful outcome. Nothing on
    // this chart matches the behavioral type except fatigue itself, now
    // permanent and capped, so it overflows again.
    let feedback: Vec<(CausalType, f32)> = report
        .events
        .iter()
        .map(|e| (e.causal_type, e.weight))
        .collect();
    let negative = OutcomeSet::from_pairs(&feedback).expect("events are well-formed");

    let second = tick(
        &mut chart,
        &FixedProgression(0.0),
        &OutcomeSet::empty(),
        &negative,
    );
    assert_eq!(second.events.len(), 1);
    assert!((chart.get("fatigue").unwrap().weight - 1.0).abs() < f32::EPSILON);
    assert_eq!(
        chart.get("fatigue").unwrap().duration,
        DurationClass::Permanent
    );
}

#[test]
fn malformed_outcomes_fail_before_any_update() {
    // Normalization rejects the collection up front, so no chart exists
    // to be half-updated.
    assert!(OutcomeSet::from_pairs(&[(CausalType::Behavioral, f32::NAN)]).is_err());
    assert!(OutcomeSet::from_pairs(&[(CausalType::Behavioral, -0.5)]).is_err());
    assert!(OutcomeSet::from_pairs(&[
        (CausalType::Behavioral, 0.2),
        (CausalType::Behavioral, 0.4),
    ])
    .is_err());
}
