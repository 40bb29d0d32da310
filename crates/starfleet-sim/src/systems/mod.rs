//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the engine-owned state
//! they need. They do not own state: all state lives in components or on
//! the engine.

pub mod ally_ai;
pub mod damage;
pub mod effects;
pub mod enemy_ai;
pub mod flight;
pub mod projectiles;
pub mod snapshot;
pub mod subsystems;
pub mod target_lock;
pub mod weapons;
