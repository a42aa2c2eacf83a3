//! Save/Load functionality for persisting simulation state.
//!
//! Uses bincode for compact binary serialization. Agents are extracted
//! into plain records and respawned on load; the catalog and the
//! progression model are configuration, re-injected by the host rather
//! than persisted.

use crate::clock::SimClock;
use crate::components::{Agent, Identity, OutcomeQueue};
use crate::monitor::MonitorRunner;
use caresim_logic::chart::ConditionChart;
use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Version number for the save format (increment when the format changes).
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state.
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Simulation time in hours.
    pub sim_time: f64,
    /// Hour of the last assessment pass.
    pub last_assess: f64,
    pub clock: SimClock,
    pub monitor: MonitorRunner,
    pub agents: Vec<AgentRecord>,
}

/// One agent, flattened out of the ECS world.
#[derive(Serialize, Deserialize)]
pub struct AgentRecord {
    pub identity: Identity,
    pub chart: ConditionChart,
    pub queue: OutcomeQueue,
}

fn collect_agents(world: &World) -> Vec<AgentRecord> {
    let mut agents = Vec::new();
    for (_, (_, identity, chart, queue)) in world
        .query::<(&Agent, &Identity, &ConditionChart, &OutcomeQueue)>()
        .iter()
    {
        agents.push(AgentRecord {
            identity: identity.clone(),
            chart: chart.clone(),
            queue: queue.clone(),
        });
    }
    agents
}

fn respawn_agents(world: &mut World, agents: Vec<AgentRecord>) {
    for record in agents {
        world.spawn((Agent, record.identity, record.chart, record.queue));
    }
}

/// Save the complete simulation to a writer.
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    sim_time: f64,
    last_assess: f64,
    clock: &SimClock,
    monitor: &MonitorRunner,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time,
        last_assess,
        clock: *clock,
        monitor: monitor.clone(),
        agents: collect_agents(world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader.
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    respawn_agents(&mut world, save_data.agents);

    Ok(LoadedSimulation {
        world,
        sim_time: save_data.sim_time,
        last_assess: save_data.last_assess,
        clock: save_data.clock,
        monitor: save_data.monitor,
    })
}

/// Result of loading a simulation.
pub struct LoadedSimulation {
    pub world: World,
    pub sim_time: f64,
    pub last_assess: f64,
    pub clock: SimClock,
    pub monitor: MonitorRunner,
}

/// Errors that can occur during save/load.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}
