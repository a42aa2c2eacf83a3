//! Per-agent condition chart.
//!
//! The chart owns every active condition instance for one agent.
//! Instances are copied in at creation and cloned out in snapshots, so no
//! caller can alias the chart's internal state. Iteration follows
//! insertion order, which keeps snapshots and emitted events reproducible
//! run to run.
//!
//! Charts are strictly per-agent: concurrent assessment of different
//! agents needs no coordination, and concurrent assessment of the same
//! agent is not supported.

use crate::catalog::{CatalogError, ConditionCatalog, ConditionTemplate};
use crate::condition::ConditionInstance;
use serde::{Deserialize, Serialize};

/// Clock capability: the only time semantics the chart needs.
pub trait Clock {
    /// Age in years of someone born in `birth_year`.
    fn age(&self, birth_year: i32) -> f32;
}

/// A pre-existing condition supplied at agent creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorCondition {
    pub template: ConditionTemplate,
    /// Starting severity.
    pub weight: f32,
}

/// The set of active conditions for a single agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionChart {
    birth_year: i32,
    /// Label-unique, insertion-ordered.
    conditions: Vec<ConditionInstance>,
}

impl ConditionChart {
    /// Seed a chart from prior conditions. Definitions are copied, never
    /// aliased; a repeated label keeps the last definition.
    pub fn new(birth_year: i32, priors: &[PriorCondition]) -> Self {
        let mut chart = Self {
            birth_year,
            conditions: Vec::with_capacity(priors.len()),
        };
        for prior in priors {
            chart.put(ConditionInstance::from_template(&prior.template, prior.weight));
        }
        chart
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    /// Agent age derived from the externally supplied clock. Pure
    /// delegation, no caching.
    pub fn age(&self, clock: &dyn Clock) -> f32 {
        clock.age(self.birth_year)
    }

    /// Current conditions as an ordered, cloned sequence.
    ///
    /// This is the stable read-only shape consumed by monitoring and
    /// progression models; mutating it never touches the chart.
    pub fn snapshot(&self) -> Vec<ConditionInstance> {
        self.conditions.clone()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    pub fn get(&self, label: &str) -> Option<&ConditionInstance> {
        self.index_of(label).map(|i| &self.conditions[i])
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Active labels in iteration order.
    pub fn labels(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.label.as_str()).collect()
    }

    /// Get the instance for `label`, creating it from the catalog at zero
    /// severity if absent.
    pub fn acquire(
        &mut self,
        label: &str,
        catalog: &ConditionCatalog,
    ) -> Result<&mut ConditionInstance, CatalogError> {
        let index = match self.index_of(label) {
            Some(index) => index,
            None => {
                let template = catalog.get(label)?;
                self.conditions
                    .push(ConditionInstance::from_template(template, 0.0));
                self.conditions.len() - 1
            }
        };
        Ok(&mut self.conditions[index])
    }

    pub(crate) fn get_mut(&mut self, label: &str) -> Option<&mut ConditionInstance> {
        match self.index_of(label) {
            Some(index) => Some(&mut self.conditions[index]),
            None => None,
        }
    }

    /// Insert or replace an instance, keeping labels unique.
    pub(crate) fn put(&mut self, instance: ConditionInstance) {
        match self.index_of(&instance.label) {
            Some(index) => self.conditions[index] = instance,
            None => self.conditions.push(instance),
        }
    }

    pub(crate) fn remove(&mut self, label: &str) -> Option<ConditionInstance> {
        self.index_of(label).map(|i| self.conditions.remove(i))
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.conditions.iter().position(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Progression;
    use crate::causality::CausalType;
    use crate::condition::DurationClass;

    struct FixedClock(f32);

    impl Clock for FixedClock {
        fn age(&self, birth_year: i32) -> f32 {
            self.0 - birth_year as f32
        }
    }

    fn template(label: &str) -> ConditionTemplate {
        ConditionTemplate {
            label: label.to_string(),
            causal_type: CausalType::Behavioral,
            duration: DurationClass::Chronic,
            progression: Progression {
                rate: 0.002,
                weight: 0.5,
            },
        }
    }

    fn prior(label: &str, weight: f32) -> PriorCondition {
        PriorCondition {
            template: template(label),
            weight,
        }
    }

    #[test]
    fn seeding_copies_definitions() {
        let priors = vec![prior("fatigue", 0.5)];
        let mut chart = ConditionChart::new(1950, &priors);

        chart.get_mut("fatigue").unwrap().weight = 0.9;
        // Caller's definition is untouched.
        assert!((priors[0].weight - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn repeated_prior_label_keeps_last() {
        let chart = ConditionChart::new(1950, &[prior("fatigue", 0.2), prior("fatigue", 0.7)]);
        assert_eq!(chart.len(), 1);
        assert!((chart.get("fatigue").unwrap().weight - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn snapshot_is_detached_and_ordered() {
        let chart = ConditionChart::new(1950, &[prior("a", 0.1), prior("b", 0.2)]);
        let mut snapshot = chart.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].label, "a");
        assert_eq!(snapshot[1].label, "b");

        snapshot[0].weight = 0.99;
        assert!((chart.get("a").unwrap().weight - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn age_delegates_to_clock() {
        let chart = ConditionChart::new(1950, &[]);
        let clock = FixedClock(2030.0);
        assert!((chart.age(&clock) - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn acquire_creates_from_catalog() {
        let catalog = ConditionCatalog::from_templates(vec![template("isolation")]).unwrap();
        let mut chart = ConditionChart::new(1950, &[]);

        let instance = chart.acquire("isolation", &catalog).unwrap();
        assert!((instance.weight - 0.0).abs() < f32::EPSILON);
        assert_eq!(chart.len(), 1);

        // Second acquire returns the existing instance.
        chart.get_mut("isolation").unwrap().weight = 0.4;
        let again = chart.acquire("isolation", &catalog).unwrap();
        assert!((again.weight - 0.4).abs() < f32::EPSILON);
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn acquire_unknown_label_errors() {
        let catalog = ConditionCatalog::from_templates(vec![]).unwrap();
        let mut chart = ConditionChart::new(1950, &[]);
        let err = chart.acquire("gout", &catalog).unwrap_err();
        assert_eq!(err, CatalogError::UnknownCondition("gout".to_string()));
        assert!(chart.is_empty());
    }

    #[test]
    fn remove_deletes_instance() {
        let mut chart = ConditionChart::new(1950, &[prior("a", 0.1)]);
        assert!(chart.remove("a").is_some());
        assert!(chart.is_empty());
        assert!(chart.remove("a").is_none());
    }
}
