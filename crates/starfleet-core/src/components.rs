//! Simulation records.
//!
//! Enemy, ally and projectile records are attached to hecs entities by the
//! simulation crate; the player ship is a single record owned by the engine.
//! Records are plain data. Game logic lives in systems.
//! Presentation-only state (meshes, particles, colours) never appears here.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::Transform;

/// Opaque, generation-checked handle to a simulated entity.
///
/// Holding one never keeps the entity alive; resolving a stale handle is a
/// lookup miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Linear velocity in units per reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec3);

/// Health and shields of an enemy or ally vessel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defenses {
    pub health: f64,
    pub max_health: f64,
    pub shields: f64,
    pub max_shields: f64,
    /// Shield bubble visible after a hit, cleared by a scheduled event.
    pub shield_flash: bool,
}

impl Defenses {
    pub fn new(health: f64, shields: f64) -> Self {
        Self {
            health,
            max_health: health,
            shields,
            max_shields: shields,
            shield_flash: false,
        }
    }
}

/// Movement and weapon characteristics shared by enemies and allies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Units per reference frame.
    pub speed: f64,
    /// Per-frame slerp rate toward the desired facing.
    pub turn_speed: f64,
    pub damage: f64,
    pub fire_rate_ms: f64,
    pub last_fire_ms: f64,
}

/// Hostile vessel bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub class: EnemyClass,
    pub credits: u32,
    /// Crew have already called this contact out.
    pub announced: bool,
    pub shield_regen_per_ms: f64,
}

/// Formation membership, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub group_id: u32,
    /// Offset from the leader, already rotated into the group bearing.
    /// Zero for the leader.
    pub offset: DVec3,
    pub is_leader: bool,
}

/// Friendly escort vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllyProfile {
    pub name: String,
    /// Station relative to the player in the player's local frame.
    pub formation_offset: DVec3,
    /// Enemy currently being engaged. Weak: may refer to a destroyed entity.
    pub engaging: Option<EntityId>,
}

/// A projectile or beam record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub damage: f64,
    pub life_ms: f64,
    /// Homing target (torpedoes only). Weak: homing stops if it disappears.
    pub target: Option<EntityId>,
    /// Far end of a beam; beams do not move.
    pub beam_end: Option<DVec3>,
}

/// Health of one ship subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub kind: SubsystemKind,
    pub health: f64,
    pub max_health: f64,
}

/// The five player subsystems, indexed by `SubsystemKind::index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subsystems(pub [Subsystem; 5]);

impl Default for Subsystems {
    fn default() -> Self {
        Self(SubsystemKind::ALL.map(|kind| Subsystem {
            kind,
            health: SUBSYSTEM_MAX_HEALTH,
            max_health: SUBSYSTEM_MAX_HEALTH,
        }))
    }
}

impl Subsystems {
    pub fn get(&self, kind: SubsystemKind) -> &Subsystem {
        &self.0[kind.index()]
    }

    pub fn get_mut(&mut self, kind: SubsystemKind) -> &mut Subsystem {
        &mut self.0[kind.index()]
    }
}

/// Torpedo bay reload state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ReloadState {
    #[default]
    Loaded,
    /// Bay is refilling; ready again at the given simulation time.
    Reloading { ready_at_ms: f64 },
}

/// Player weapon state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponBay {
    pub phaser_charge: f64,
    pub phaser_cooldown_ms: f64,
    pub phaser_damage: f64,
    pub torpedoes: u32,
    pub max_torpedoes: u32,
    pub torpedo_cooldown_ms: f64,
    pub torpedo_damage: f64,
    pub reload: ReloadState,
}

impl Default for WeaponBay {
    fn default() -> Self {
        Self {
            phaser_charge: PHASER_CHARGE_MAX,
            phaser_cooldown_ms: 0.0,
            phaser_damage: PLAYER_PHASER_DAMAGE,
            torpedoes: PLAYER_MAX_TORPEDOES,
            max_torpedoes: PLAYER_MAX_TORPEDOES,
            torpedo_cooldown_ms: 0.0,
            torpedo_damage: PLAYER_TORPEDO_DAMAGE,
            reload: ReloadState::Loaded,
        }
    }
}

/// The player's starship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShip {
    pub transform: Transform,
    pub hull: f64,
    pub max_hull: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub shields_active: bool,
    pub energy: f64,
    pub max_energy: f64,
    /// Impulse throttle, units per frame.
    pub speed: f64,
    pub max_speed: f64,
    pub warp: f64,
    pub max_warp: f64,
    pub autopilot: bool,
    pub credits: u32,
    /// Remaining time the shield bubble is shown after a hit.
    pub shield_flash_ms: f64,
    /// Shield percentage at the last crew report.
    pub last_shield_report: u32,
    pub weapons: WeaponBay,
    pub subsystems: Subsystems,
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            hull: PLAYER_MAX_HULL,
            max_hull: PLAYER_MAX_HULL,
            shields: PLAYER_MAX_SHIELDS,
            max_shields: PLAYER_MAX_SHIELDS,
            shields_active: true,
            energy: PLAYER_MAX_ENERGY,
            max_energy: PLAYER_MAX_ENERGY,
            speed: 0.0,
            max_speed: PLAYER_MAX_SPEED,
            warp: 0.0,
            max_warp: PLAYER_MAX_WARP,
            autopilot: false,
            credits: 0,
            shield_flash_ms: 0.0,
            last_shield_report: 100,
            weapons: WeaponBay::default(),
            subsystems: Subsystems::default(),
        }
    }
}

/// Visual hull breach on the player ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullBreach {
    /// Offset in the ship's local frame.
    pub offset: DVec3,
    pub life_ms: f64,
}
