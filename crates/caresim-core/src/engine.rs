//! Simulation engine - main entry point for running agents through time.

use crate::clock::SimClock;
use crate::components::{Agent, Identity, OutcomeQueue};
use crate::monitor::MonitorRunner;
use crate::persistence::{load_simulation, save_simulation, SaveError};
use crate::systems::assessment_system;
use caresim_logic::assessment::Assessment;
use caresim_logic::catalog::ConditionCatalog;
use caresim_logic::causality::CausalType;
use caresim_logic::chart::{ConditionChart, PriorCondition};
use caresim_logic::progression::{ProgressionModel, StandardProgression};
use hecs::{Entity, World};
use std::io::{Read, Write};

/// Default interval between assessment passes, in hours.
const DEFAULT_ASSESS_INTERVAL: f64 = 24.0;

/// Main simulation engine.
///
/// Owns the agent world, the clock, and the collaborators of the
/// condition state machine. The engine is single-threaded: one tick
/// processes each agent to completion before the next. The catalog is
/// read-only after construction.
pub struct SimulationEngine {
    /// ECS world containing all agents.
    pub world: World,
    pub clock: SimClock,
    pub catalog: ConditionCatalog,
    pub monitor: MonitorRunner,
    progression: Box<dyn ProgressionModel>,
    /// Simulation time in hours since start.
    pub sim_time: f64,
    assess_interval: f64,
    last_assess: f64,
}

impl SimulationEngine {
    pub fn new(catalog: ConditionCatalog, start_year: i32) -> Self {
        Self {
            world: World::new(),
            clock: SimClock::new(start_year),
            catalog,
            monitor: MonitorRunner::with_default_rules(),
            progression: Box::new(StandardProgression::default()),
            sim_time: 0.0,
            assess_interval: DEFAULT_ASSESS_INTERVAL,
            last_assess: 0.0,
        }
    }

    /// Replace the progression model.
    pub fn with_progression(mut self, model: Box<dyn ProgressionModel>) -> Self {
        self.progression = model;
        self
    }

    /// Replace the monitoring runner (custom rule table).
    pub fn with_monitor(mut self, monitor: MonitorRunner) -> Self {
        self.monitor = monitor;
        self
    }

    /// Change how often assessment runs (hours of simulated time).
    pub fn set_assess_interval(&mut self, hours: f64) {
        self.assess_interval = hours;
    }

    /// Spawn an agent with the given prior conditions.
    pub fn spawn_agent(
        &mut self,
        name: &str,
        birth_year: i32,
        priors: &[PriorCondition],
    ) -> Entity {
        crate::generation::spawn_agent(&mut self.world, name, birth_year, priors)
    }

    /// Queue a beneficial outcome for an agent's next assessment.
    /// Returns false if the entity is not an agent.
    pub fn queue_positive(&mut self, agent: Entity, ty: CausalType, magnitude: f32) -> bool {
        match self.world.get::<&mut OutcomeQueue>(agent) {
            Ok(mut queue) => {
                queue.push_positive(ty, magnitude);
                true
            }
            Err(_) => false,
        }
    }

    /// Queue a harmful outcome for an agent's next assessment.
    /// Returns false if the entity is not an agent.
    pub fn queue_negative(&mut self, agent: Entity, ty: CausalType, magnitude: f32) -> bool {
        match self.world.get::<&mut OutcomeQueue>(agent) {
            Ok(mut queue) => {
                queue.push_negative(ty, magnitude);
                true
            }
            Err(_) => false,
        }
    }

    /// Put a condition on an agent's chart by catalog label, created at
    /// zero severity if not already present. Returns false if the entity
    /// is not an agent or the label is unknown.
    pub fn add_condition(&mut self, agent: Entity, label: &str) -> bool {
        match self.world.get::<&mut ConditionChart>(agent) {
            Ok(mut chart) => chart.acquire(label, &self.catalog).is_ok(),
            Err(_) => false,
        }
    }

    /// Advance the simulation by `delta_hours`.
    ///
    /// Assessment and monitoring run at the configured interval; calls
    /// with smaller deltas just accumulate time.
    pub fn update(&mut self, delta_hours: f64) {
        self.sim_time += delta_hours;
        self.clock.advance(delta_hours);

        if self.sim_time - self.last_assess >= self.assess_interval {
            self.run_assessment();
            self.last_assess = self.sim_time;
        }
    }

    fn run_assessment(&mut self) {
        let reports = assessment_system(
            &mut self.world,
            &self.catalog,
            self.progression.as_ref(),
            &self.clock,
        );
        for (name, report) in &reports {
            if !report.events.is_empty() {
                log::info!("{}: {} emerging event(s)", name, report.events.len());
            }
        }

        // Monitoring pass over the post-assessment snapshots.
        let base_seed = time_seed(self.sim_time);
        let snapshots: Vec<(String, Vec<_>)> = self
            .world
            .query::<(&Agent, &Identity, &ConditionChart)>()
            .iter()
            .map(|(_, (_, identity, chart))| (identity.name.clone(), chart.snapshot()))
            .collect();
        for (index, (name, snapshot)) in snapshots.iter().enumerate() {
            let seed = base_seed.wrapping_add((index as u32).wrapping_mul(2654435761));
            self.monitor
                .run(name, snapshot, self.sim_time, seed);
        }
    }

    /// Run assessment immediately, ignoring the interval. Returns the
    /// per-agent reports.
    pub fn assess_now(&mut self) -> Vec<(String, Assessment)> {
        let reports = assessment_system(
            &mut self.world,
            &self.catalog,
            self.progression.as_ref(),
            &self.clock,
        );
        self.last_assess = self.sim_time;
        reports
    }

    pub fn agent_count(&self) -> usize {
        self.world.query::<(&Agent, &Identity)>().iter().count()
    }

    /// A cloned chart snapshot for the named agent, if present.
    pub fn chart_of(&self, name: &str) -> Option<ConditionChart> {
        self.world
            .query::<(&Agent, &Identity, &ConditionChart)>()
            .iter()
            .find(|(_, (_, identity, _))| identity.name == name)
            .map(|(_, (_, _, chart))| chart.clone())
    }

    /// Save the complete simulation to a writer.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        save_simulation(
            writer,
            &self.world,
            self.sim_time,
            self.last_assess,
            &self.clock,
            &self.monitor,
        )
    }

    /// Load simulation state from a reader, replacing the current world.
    ///
    /// The catalog and progression model are configuration and stay as
    /// constructed.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = load_simulation(reader)?;
        self.world = loaded.world;
        self.sim_time = loaded.sim_time;
        self.last_assess = loaded.last_assess;
        self.clock = loaded.clock;
        self.monitor = loaded.monitor;
        Ok(())
    }
}

/// Derive a monitoring seed from high-precision time bits.
fn time_seed(sim_time: f64) -> u32 {
    let time_bits = (sim_time * 100_000.0) as u64;
    let hash = time_bits
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (hash >> 32) as u32
}
