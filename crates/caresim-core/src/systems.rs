//! Assessment system - runs the condition state machine over every agent.

use crate::components::{Agent, Identity, OutcomeQueue};
use caresim_logic::assessment::{assess, Assessment};
use caresim_logic::catalog::ConditionCatalog;
use caresim_logic::causality::OutcomeSet;
use caresim_logic::chart::{Clock, ConditionChart};
use caresim_logic::progression::ProgressionModel;
use hecs::World;

/// Run one assessment tick for every agent.
///
/// Each agent's queued outcomes are drained and normalized, the chart is
/// assessed, and any emerging events go straight back into that agent's
/// queue as harmful outcomes for the next tick. Returns the per-agent
/// reports in case the host wants to inspect them.
pub fn assessment_system(
    world: &mut World,
    catalog: &ConditionCatalog,
    model: &dyn ProgressionModel,
    clock: &dyn Clock,
) -> Vec<(String, Assessment)> {
    let mut reports = Vec::new();

    for (_, (_, identity, chart, queue)) in
        world.query_mut::<(&Agent, &Identity, &mut ConditionChart, &mut OutcomeQueue)>()
    {
        let (positive_pairs, negative_pairs) = queue.drain();

        let positive = match OutcomeSet::from_pairs(&positive_pairs) {
            Ok(set) => set,
            Err(e) => {
                log::error!("{}: dropping malformed positive outcomes: {}", identity.name, e);
                continue;
            }
        };
        let negative = match OutcomeSet::from_pairs(&negative_pairs) {
            Ok(set) => set,
            Err(e) => {
                log::error!("{}: dropping malformed negative outcomes: {}", identity.name, e);
                continue;
            }
        };

        let report = assess(chart, catalog, model, clock, &positive, &negative);

        for label in &report.unresolved {
            log::warn!("{}: condition '{}' not in catalog, skipped", identity.name, label);
        }
        for event in &report.events {
            log::info!(
                "{}: emerging event type={} weight={:.3}",
                identity.name,
                event.causal_type.as_str(),
                event.weight
            );
            queue.push_negative(event.causal_type, event.weight);
        }

        reports.push((identity.name.clone(), report));
    }

    reports
}
