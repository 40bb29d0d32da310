//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Hostile vessel class. Stats come from the enemy registry, not from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyClass {
    Klingon,
    Romulan,
    Borg,
    Gorn,
    Cardassian,
}

impl EnemyClass {
    pub const ALL: [EnemyClass; 5] = [
        EnemyClass::Klingon,
        EnemyClass::Romulan,
        EnemyClass::Borg,
        EnemyClass::Gorn,
        EnemyClass::Cardassian,
    ];

    /// Display name used in crew reports.
    pub fn vessel_name(self) -> &'static str {
        match self {
            EnemyClass::Klingon => "Klingon Bird of Prey",
            EnemyClass::Romulan => "Romulan Warbird",
            EnemyClass::Borg => "Borg Cube",
            EnemyClass::Gorn => "Gorn Raider",
            EnemyClass::Cardassian => "Cardassian Galor-class",
        }
    }
}

/// Projectile kind. Beams are instantaneous; their records only feed the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    PhaserBeam,
    Torpedo,
    AllyBeam,
    EnemyShot,
}

impl ProjectileKind {
    pub fn is_beam(self) -> bool {
        matches!(self, ProjectileKind::PhaserBeam | ProjectileKind::AllyBeam)
    }
}

/// Player ship subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsystemKind {
    Engines,
    WarpCore,
    Weapons,
    Shields,
    Sensors,
}

impl SubsystemKind {
    pub const ALL: [SubsystemKind; 5] = [
        SubsystemKind::Engines,
        SubsystemKind::WarpCore,
        SubsystemKind::Weapons,
        SubsystemKind::Shields,
        SubsystemKind::Sensors,
    ];

    pub fn index(self) -> usize {
        match self {
            SubsystemKind::Engines => 0,
            SubsystemKind::WarpCore => 1,
            SubsystemKind::Weapons => 2,
            SubsystemKind::Shields => 3,
            SubsystemKind::Sensors => 4,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SubsystemKind::Engines => "Impulse Engines",
            SubsystemKind::WarpCore => "Warp Core",
            SubsystemKind::Weapons => "Weapons Array",
            SubsystemKind::Shields => "Shield Generators",
            SubsystemKind::Sensors => "Sensor Array",
        }
    }
}

/// Weapon that produced a `WeaponFired` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Phaser,
    Torpedo,
    AllyPhaser,
    EnemyDisruptor,
}

/// Player throttle intent for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Throttle {
    #[default]
    Hold,
    Accelerate,
    Decelerate,
    Stop,
}

/// Mission progression state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionPhase {
    #[default]
    Inactive,
    WaveActive,
    WaveClearPause,
    MissionComplete,
    MissionFailed,
}

impl MissionPhase {
    pub fn is_over(self) -> bool {
        matches!(self, MissionPhase::MissionComplete | MissionPhase::MissionFailed)
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    GameOver,
}

/// Purchasable ship upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    HullPlating,
    ShieldBoost,
    PhaserUpgrade,
    TorpedoUpgrade,
    ExtraTorpedoes,
    EngineBoost,
    WarpCore,
    EnergyCell,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 8] = [
        UpgradeKind::HullPlating,
        UpgradeKind::ShieldBoost,
        UpgradeKind::PhaserUpgrade,
        UpgradeKind::TorpedoUpgrade,
        UpgradeKind::ExtraTorpedoes,
        UpgradeKind::EngineBoost,
        UpgradeKind::WarpCore,
        UpgradeKind::EnergyCell,
    ];
}
