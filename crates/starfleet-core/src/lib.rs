//! Core types and definitions for the Starfleet combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshots, events, constants and the content
//! registry (enemy templates, missions, upgrades).
//! It has no dependency on the ECS or any host runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod registry;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
