//! Headless host for the starship combat simulation.
//!
//! Drives `SimulationEngine` either fast-forward for scripted runs or on a
//! fixed-rate thread for interactive front ends.

pub mod game_loop;
pub mod pilot;
pub mod runner;
pub mod state;
pub mod telemetry;

pub use starfleet_core as core;
