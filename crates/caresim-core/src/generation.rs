//! Agent generation - seeded or randomized agents.

use crate::components::{Agent, Identity, OutcomeQueue};
use caresim_logic::catalog::ConditionCatalog;
use caresim_logic::chart::{ConditionChart, PriorCondition};
use hecs::{Entity, World};
use rand::Rng;

/// Spawn an agent with the given prior conditions.
///
/// Prior definitions are copied into the chart, never aliased.
pub fn spawn_agent(
    world: &mut World,
    name: &str,
    birth_year: i32,
    priors: &[PriorCondition],
) -> Entity {
    world.spawn((
        Agent,
        Identity {
            name: name.to_string(),
            birth_year,
        },
        ConditionChart::new(birth_year, priors),
        OutcomeQueue::default(),
    ))
}

/// Spawn an agent with random priors drawn from the catalog.
///
/// Each catalog condition has a 25% chance of being present, at a random
/// mild-to-moderate starting severity.
pub fn random_agent(
    world: &mut World,
    name: &str,
    catalog: &ConditionCatalog,
    current_year: i32,
    rng: &mut impl Rng,
) -> Entity {
    let birth_year = current_year - rng.gen_range(20..90);

    let mut priors = Vec::new();
    for label in catalog.labels() {
        if !rng.gen_bool(0.25) {
            continue;
        }
        if let Ok(template) = catalog.get(label) {
            priors.push(PriorCondition {
                template: template.clone(),
                weight: rng.gen_range(0.1..0.6),
            });
        }
    }

    spawn_agent(world, name, birth_year, &priors)
}
