//! Player commands and held input sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary. Input is
//! polled state: the host overwrites it whenever its devices change and the
//! simulation reads it once per tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Discrete player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Mission control ---
    /// Start (or restart) the mission with the given roster key.
    StartMission { mission: String },
    /// Abandon the current mission and return to the menu.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,

    // --- Ship actions ---
    /// Fire a photon torpedo.
    FireTorpedo,
    /// Raise or lower the deflector shields.
    ToggleShields,
    /// Engage or disengage the autopilot.
    ToggleAutopilot,
    /// Buy a ship upgrade with accumulated credits.
    PurchaseUpgrade { upgrade: UpgradeKind },
}

/// Held control state for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub throttle: Throttle,
    /// Pointer x in [-1, 1]; positive turns right.
    pub yaw: f64,
    /// Pointer y in [-1, 1]; positive pitches up.
    pub pitch: f64,
    pub warp: bool,
    pub fire_phaser: bool,
    pub repair: bool,
    /// World-space aim point projected from the pointer, if the host has one.
    pub aim_point: Option<DVec3>,
}

impl PlayerInput {
    /// Copy with pointer axes clamped to [-1, 1] and non-finite values zeroed.
    pub fn sanitized(self) -> Self {
        let axis = |v: f64| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            yaw: axis(self.yaw),
            pitch: axis(self.pitch),
            aim_point: self.aim_point.filter(|p| p.is_finite()),
            ..self
        }
    }
}
