//! Simulation engine for the Starfleet combat game.
//!
//! Owns the hecs ECS world, runs systems once per host frame,
//! and produces GameStateSnapshots for the presentation layer.

pub mod engine;
pub mod mission;
pub mod scheduler;
pub mod systems;
pub mod upgrades;
pub mod world_setup;

pub use engine::{CommandError, SimConfig, SimulationEngine};
pub use starfleet_core as core;
