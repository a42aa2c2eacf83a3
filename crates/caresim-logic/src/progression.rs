//! Natural-progression drift models.
//!
//! Conditions drift on their own, independent of outcomes: a stress
//! episode fades, an addiction deepens. The drift formula is behind a
//! trait seam so hosts can swap models without touching the state
//! machine, and tests can pin the delta exactly.

use crate::condition::ConditionInstance;
use serde::{Deserialize, Serialize};

/// Signed severity drift for one condition over one assessment tick.
///
/// Implementations must be pure and deterministic for identical inputs;
/// nothing else in the state machine injects nondeterminism.
pub trait ProgressionModel {
    /// `rate` and `weight` come from the condition's template, `age` is
    /// the agent's age in years, and `chart` is the agent's full set of
    /// active conditions at the start of the tick.
    fn cost(&self, rate: f32, weight: f32, age: f32, chart: &[ConditionInstance]) -> f32;
}

/// Standard drift formula.
///
/// The template rate is scaled by the template weight, an age factor
/// (linear, doubling at `reference_age`), and a comorbidity factor
/// derived from the summed severity of the whole chart. Drift direction
/// comes solely from the sign of the rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardProgression {
    /// Age at which the age factor reaches 2.0.
    pub reference_age: f32,
    /// How strongly co-occurring condition load amplifies drift.
    pub comorbidity_gain: f32,
}

impl Default for StandardProgression {
    fn default() -> Self {
        Self {
            reference_age: 80.0,
            comorbidity_gain: 0.5,
        }
    }
}

impl ProgressionModel for StandardProgression {
    fn cost(&self, rate: f32, weight: f32, age: f32, chart: &[ConditionInstance]) -> f32 {
        let age_factor = 1.0 + (age / self.reference_age).max(0.0);
        let load: f32 = chart.iter().map(|c| c.weight).sum();
        let risk_factor = 1.0 + self.comorbidity_gain * load;
        rate * weight * age_factor * risk_factor
    }
}

/// Fixed-delta model for tests and calibration sweeps.
#[derive(Debug, Clone, Copy)]
pub struct FixedProgression(pub f32);

impl ProgressionModel for FixedProgression {
    fn cost(&self, _rate: f32, _weight: f32, _age: f32, _chart: &[ConditionInstance]) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Progression;
    use crate::causality::CausalType;
    use crate::condition::DurationClass;

    fn instance(weight: f32) -> ConditionInstance {
        ConditionInstance {
            label: "fatigue".to_string(),
            causal_type: CausalType::Behavioral,
            duration: DurationClass::Chronic,
            progression: Progression {
                rate: 0.002,
                weight: 0.5,
            },
            weight,
        }
    }

    #[test]
    fn sign_follows_rate() {
        let model = StandardProgression::default();
        assert!(model.cost(0.01, 1.0, 40.0, &[]) > 0.0);
        assert!(model.cost(-0.01, 1.0, 40.0, &[]) < 0.0);
        assert!((model.cost(0.0, 1.0, 40.0, &[])).abs() < f32::EPSILON);
    }

    #[test]
    fn magnitude_grows_with_age() {
        let model = StandardProgression::default();
        let young = model.cost(0.01, 1.0, 20.0, &[]);
        let old = model.cost(0.01, 1.0, 80.0, &[]);
        assert!(old > young);
    }

    #[test]
    fn magnitude_grows_with_comorbidity_load() {
        let model = StandardProgression::default();
        let alone = model.cost(0.01, 1.0, 40.0, &[]);
        let loaded = model.cost(0.01, 1.0, 40.0, &[instance(0.8), instance(0.6)]);
        assert!(loaded > alone);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let model = StandardProgression::default();
        let chart = [instance(0.5)];
        let a = model.cost(0.01, 0.7, 63.0, &chart);
        let b = model.cost(0.01, 0.7, 63.0, &chart);
        assert!((a - b).abs() < f32::EPSILON);
    }

    #[test]
    fn fixed_model_ignores_inputs() {
        let model = FixedProgression(0.1);
        assert!((model.cost(-5.0, 0.0, 900.0, &[instance(1.0)]) - 0.1).abs() < f32::EPSILON);
    }
}
