//! Game state snapshot: the complete visible state handed to the host each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::components::{EntityId, HullBreach, ReloadState, Subsystem};
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::SimTime;

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mission_phase: MissionPhase,
    pub mission: Option<String>,
    pub wave: u32,
    pub max_waves: Option<u32>,
    pub ship: ShipView,
    pub subsystems: Vec<SubsystemView>,
    pub enemies: Vec<EnemyView>,
    pub allies: Vec<AllyView>,
    pub projectiles: Vec<ProjectileView>,
    pub target_lock: Option<TargetView>,
    pub kill_cam: Option<KillCamView>,
    pub hull_breaches: Vec<HullBreach>,
    pub score: ScoreView,
    pub events: Vec<SimEvent>,
}

/// Player ship status for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipView {
    pub position: DVec3,
    pub orientation: DQuat,
    pub hull: f64,
    pub max_hull: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub shields_active: bool,
    pub shield_flash: bool,
    pub energy: f64,
    pub max_energy: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub warp: f64,
    pub max_warp: f64,
    pub autopilot: bool,
    pub phaser_charge: f64,
    pub phaser_damage: f64,
    pub torpedoes: u32,
    pub max_torpedoes: u32,
    pub torpedo_damage: f64,
    /// Seconds until the torpedo bay is reloaded, if reloading.
    pub reload_remaining_secs: Option<f64>,
    pub credits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsystemView {
    pub kind: SubsystemKind,
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub efficiency: f64,
}

impl SubsystemView {
    pub fn new(subsystem: &Subsystem, efficiency: f64) -> Self {
        Self {
            kind: subsystem.kind,
            name: subsystem.kind.display_name().to_string(),
            health: subsystem.health,
            max_health: subsystem.max_health,
            efficiency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub class: EnemyClass,
    pub position: DVec3,
    pub orientation: DQuat,
    pub health: f64,
    pub max_health: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub shield_flash: bool,
    pub group_id: u32,
    pub is_leader: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllyView {
    pub id: EntityId,
    pub name: String,
    pub position: DVec3,
    pub orientation: DQuat,
    pub health: f64,
    pub max_health: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub shield_flash: bool,
    pub engaging: Option<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub position: DVec3,
    pub velocity: DVec3,
    pub beam_end: Option<DVec3>,
    pub life_ms: f64,
}

/// Current target lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    pub class: EnemyClass,
    pub distance: f64,
    /// Hull remaining, 0-100.
    pub hull_percent: u32,
}

/// Kill-cam focus for the camera collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KillCamView {
    pub focus: DVec3,
    pub remaining_ms: f64,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub enemies_destroyed: u32,
    pub waves_completed: u32,
    pub torpedoes_fired: u32,
    pub phasers_fired: u32,
    pub allies_lost: u32,
}

/// Seconds left on a torpedo reload, if one is running.
pub fn reload_remaining_secs(reload: ReloadState, now_ms: f64) -> Option<f64> {
    match reload {
        ReloadState::Loaded => None,
        ReloadState::Reloading { ready_at_ms } => Some(((ready_at_ms - now_ms) / 1000.0).max(0.0)),
    }
}
