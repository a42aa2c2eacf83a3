//! Per-tick condition assessment: natural progression, outcome credit,
//! and severity overflow.
//!
//! One assessment pass walks every active condition on a chart, combines
//! three delta sources — natural drift, beneficial-outcome credit,
//! harmful-outcome penalty — under the duration-class accumulation
//! policy, and applies the result through the overflow handler. Severity
//! that spills past 1.0 escalates the condition's duration class and
//! comes back to the caller as an [`EmergingEvent`], to be fed into a
//! later tick as a new harmful outcome.
//!
//! ```
//! use caresim_logic::assessment::assess;
//! use caresim_logic::catalog::{ConditionCatalog, ConditionTemplate, Progression};
//! use caresim_logic::causality::{CausalType, OutcomeSet};
//! use caresim_logic::chart::{Clock, ConditionChart, PriorCondition};
//! use caresim_logic::condition::DurationClass;
//! use caresim_logic::progression::FixedProgression;
//!
//! struct FixedClock(f32);
//! impl Clock for FixedClock {
//!     fn age(&self, birth_year: i32) -> f32 {
//!         self.0 - birth_year as f32
//!     }
//! }
//!
//! let template = ConditionTemplate {
//!     label: "addiction".to_string(),
//!     causal_type: CausalType::Dependent,
//!     duration: DurationClass::Permanent,
//!     progression: Progression { rate: 0.003, weight: 1.0 },
//! };
//! let catalog = ConditionCatalog::from_templates(vec![template.clone()]).unwrap();
//! let mut chart = ConditionChart::new(
//!     1960,
//!     &[PriorCondition { template, weight: 0.9 }],
//! );
//!
//! let negative = OutcomeSet::from_pairs(&[(CausalType::Dependent, 0.3)]).unwrap();
//! let report = assess(
//!     &mut chart,
//!     &catalog,
//!     &FixedProgression(0.0),
//!     &FixedClock(2026.0),
//!     &OutcomeSet::empty(),
//!     &negative,
//! );
//!
//! // 0.9 + 0.3 overflows: severity clamps to 1.0, the excess spills out.
//! assert_eq!(report.events.len(), 1);
//! assert!((report.events[0].weight - 0.2).abs() < 1e-6);
//! assert!((chart.get("addiction").unwrap().weight - 1.0).abs() < f32::EPSILON);
//! ```

use crate::catalog::ConditionCatalog;
use crate::causality::{CausalType, OutcomeSet};
use crate::chart::{Clock, ConditionChart};
use crate::condition::DurationClass;
use crate::progression::ProgressionModel;
use serde::{Deserialize, Serialize};

/// Overflow of a condition's severity past its cap, surfaced as a new
/// harmful signal for future ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergingEvent {
    /// Copied from the overflowing condition.
    pub causal_type: CausalType,
    /// The overflow amount: severity that did not fit under the cap.
    pub weight: f32,
}

/// Result of one assessment pass over a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Overflow events in chart-iteration order.
    pub events: Vec<EmergingEvent>,
    /// Labels whose catalog lookup failed. Those conditions were left
    /// untouched this tick; everything else was still processed.
    pub unresolved: Vec<String>,
}

/// Run one tick of condition updates against a chart.
///
/// Outcome collections are already normalized: a malformed collection
/// fails in [`OutcomeSet`] construction before this point, so the chart
/// is never partially updated from bad input.
///
/// For each active condition the natural drift is computed from the
/// catalog's template parameters, outcome magnitudes matching the
/// condition's causal type contribute (beneficial reduces severity,
/// harmful increases it), each source is filtered through
/// [`DurationClass::retains`], and the summed delta goes through
/// [`apply_delta`].
pub fn assess(
    chart: &mut ConditionChart,
    catalog: &ConditionCatalog,
    model: &dyn ProgressionModel,
    clock: &dyn Clock,
    positive: &OutcomeSet,
    negative: &OutcomeSet,
) -> Assessment {
    let age = chart.age(clock);
    // Snapshot fixes iteration order and gives the progression model the
    // full condition set as of tick start, even as the chart mutates.
    let start = chart.snapshot();
    let mut assessment = Assessment::default();

    for instance in &start {
        let template = match catalog.get(&instance.label) {
            Ok(template) => template,
            Err(_) => {
                assessment.unresolved.push(instance.label.clone());
                continue;
            }
        };

        let natural = model.cost(
            template.progression.rate,
            template.progression.weight,
            age,
            &start,
        );
        let beneficial = match positive.get(instance.causal_type) {
            Some(magnitude) => -magnitude,
            None => 0.0,
        };
        let harmful = negative.get(instance.causal_type).unwrap_or(0.0);

        let duration = instance.duration;
        let delta: f32 = [natural, beneficial, harmful]
            .into_iter()
            .filter(|source| duration.retains(*source))
            .sum();

        if let Some(event) = apply_delta(chart, &instance.label, delta) {
            assessment.events.push(event);
        }
    }

    assessment
}

/// Apply a combined delta to one condition: removal, overflow escalation,
/// or a plain severity update.
///
/// A temporary condition whose resulting severity is at or below zero is
/// removed without an event. Severity past 1.0 emits an event carrying
/// the overflow, escalates the duration class one step, and clamps the
/// stored severity to exactly 1.0.
pub fn apply_delta(
    chart: &mut ConditionChart,
    label: &str,
    delta: f32,
) -> Option<EmergingEvent> {
    let (duration, weight, causal_type) = {
        let instance = chart.get(label)?;
        (instance.duration, instance.weight, instance.causal_type)
    };

    if duration == DurationClass::Temporary && weight + delta <= 0.0 {
        chart.remove(label);
        return None;
    }

    let instance = chart.get_mut(label)?;
    if weight + delta > 1.0 {
        let overflow = weight + delta - 1.0;
        instance.duration = duration.escalated();
        instance.weight = 1.0;
        return Some(EmergingEvent {
            causal_type,
            weight: overflow,
        });
    }

    instance.weight += delta;
    None
}
