//! CareSim simulation engine.
//!
//! Wraps the pure condition state machine from `caresim-logic` with
//! everything a running simulation needs: agents as ECS entities, a
//! simulated clock, the per-tick assessment system with event feedback,
//! the monitoring runner, agent generation, and save/load.

pub mod catalog_data;
pub mod clock;
pub mod components;
pub mod engine;
pub mod generation;
pub mod monitor;
pub mod persistence;
pub mod systems;
