//! Combat AI for the Starfleet simulation.
//!
//! Pure decision functions for enemy formation flying, ally escort behaviour
//! and wave formation layout. No ECS dependency: systems gather plain data,
//! call in here, and apply the returned displacement and facing.

pub mod formation;
pub mod steering;

pub use starfleet_core as core;

#[cfg(test)]
mod tests;
