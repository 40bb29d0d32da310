//! Events emitted by the simulation for audio, crew dialog and UI feedback.
//!
//! Fire-and-forget: the simulation never reads them back.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::EntityId;
use crate::enums::*;

/// Which side took a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    Player,
    Enemy(EntityId),
    Ally(EntityId),
}

/// End-of-mission summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub mission: String,
    pub waves_completed: u32,
    pub enemies_destroyed: u32,
    pub credits: u32,
    /// Surviving allies out of those deployed, for fleet missions.
    pub fleet_surviving: Option<(u32, u32)>,
}

/// Simulation-to-presentation notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    ShieldHit { target: HitTarget },
    HullHit { target: HitTarget },
    Explosion { position: DVec3 },
    WeaponFired { weapon: WeaponKind },
    SystemFailing { system: SubsystemKind },
    SystemOffline { system: SubsystemKind },
    SystemsRepaired,
    WaveAnnounced { wave: u32, enemy_count: u32 },
    WaveCleared { wave: u32 },
    EnemyAnnounced { enemy: EntityId, class: EnemyClass, distance: f64 },
    ShieldThresholdCrossed { percent: u32 },
    HullIntegrity { percent: u32 },
    HullBreach,
    EnemyShieldsDown { enemy: EntityId },
    EnemyDestroyed { enemy: EntityId, class: EnemyClass, credits: u32 },
    TargetLocked { enemy: EntityId },
    TorpedoReloadStarted,
    TorpedoReloaded,
    AllyLost { name: String },
    FleetReady { count: u32 },
    UpgradePurchased { upgrade: UpgradeKind },
    /// Transient status line, e.g. a refused action.
    StatusMessage { message: String },
    MissionEnded { victory: bool, summary: MissionSummary },
}
