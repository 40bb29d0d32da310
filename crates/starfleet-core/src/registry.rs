//! Content registry: enemy stat templates, wave composition tables,
//! the mission roster and the upgrade catalog.
//!
//! Content variants are data, not branching logic. Defaults reproduce the
//! shipped game; hosts may load alternatives through `config::Content`.

use std::collections::BTreeMap;

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::enums::{EnemyClass, UpgradeKind};

/// Stat template for one enemy class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub health: f64,
    pub shields: f64,
    /// Units per reference frame.
    pub speed: f64,
    pub turn_speed: f64,
    pub damage: f64,
    pub fire_rate_ms: f64,
    pub credits: u32,
    #[serde(default)]
    pub shield_regen_per_ms: f64,
}

/// One weighted entry of a composition table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedClass {
    pub class: EnemyClass,
    pub weight: f64,
}

/// Weighted random choice over enemy classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable {
    pub entries: Vec<WeightedClass>,
}

impl WeightedTable {
    pub fn new(entries: &[(EnemyClass, f64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(class, weight)| WeightedClass { class, weight })
                .collect(),
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight.max(0.0)).sum()
    }

    /// Draw one class. An empty or zero-weight table falls back to Klingon.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EnemyClass {
        let total = self.total_weight();
        let fallback = self
            .entries
            .last()
            .map(|e| e.class)
            .unwrap_or(EnemyClass::Klingon);
        if total <= 0.0 {
            return fallback;
        }
        let mut roll = rng.gen::<f64>() * total;
        for entry in &self.entries {
            let weight = entry.weight.max(0.0);
            if roll < weight {
                return entry.class;
            }
            roll -= weight;
        }
        fallback
    }
}

/// Composition table that applies from `min_wave` onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTier {
    pub min_wave: u32,
    pub table: WeightedTable,
}

/// Enemy stat templates plus wave-gated composition tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRegistry {
    pub templates: BTreeMap<EnemyClass, EnemyTemplate>,
    pub tiers: Vec<SpawnTier>,
}

impl EnemyRegistry {
    pub fn template(&self, class: EnemyClass) -> Option<&EnemyTemplate> {
        self.templates.get(&class)
    }

    /// Composition table for a wave: the tier with the highest `min_wave <= wave`.
    pub fn tier_for_wave(&self, wave: u32) -> Option<&WeightedTable> {
        self.tiers
            .iter()
            .filter(|t| t.min_wave <= wave)
            .max_by_key(|t| t.min_wave)
            .map(|t| &t.table)
    }

    /// Wave-gated weighted roll for one enemy's class.
    pub fn roll_class<R: Rng + ?Sized>(&self, wave: u32, rng: &mut R) -> EnemyClass {
        self.tier_for_wave(wave)
            .map(|table| table.sample(rng))
            .unwrap_or(EnemyClass::Klingon)
    }
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        use EnemyClass::*;

        let templates = BTreeMap::from([
            (
                Klingon,
                EnemyTemplate {
                    health: 120.0,
                    shields: 120.0,
                    speed: 0.4,
                    turn_speed: 0.015,
                    damage: 30.0,
                    fire_rate_ms: 1200.0,
                    credits: 100,
                    shield_regen_per_ms: 0.0,
                },
            ),
            (
                Romulan,
                EnemyTemplate {
                    health: 100.0,
                    shields: 100.0,
                    speed: 0.5,
                    turn_speed: 0.02,
                    damage: 25.0,
                    fire_rate_ms: 1500.0,
                    credits: 150,
                    shield_regen_per_ms: 0.0,
                },
            ),
            (
                Borg,
                EnemyTemplate {
                    health: 300.0,
                    shields: 200.0,
                    speed: 0.2,
                    turn_speed: 0.008,
                    damage: 50.0,
                    fire_rate_ms: 2000.0,
                    credits: 400,
                    shield_regen_per_ms: 0.004,
                },
            ),
            (
                Gorn,
                EnemyTemplate {
                    health: 80.0,
                    shields: 60.0,
                    speed: 0.7,
                    turn_speed: 0.03,
                    damage: 20.0,
                    fire_rate_ms: 800.0,
                    credits: 80,
                    shield_regen_per_ms: 0.0,
                },
            ),
            (
                Cardassian,
                EnemyTemplate {
                    health: 150.0,
                    shields: 150.0,
                    speed: 0.35,
                    turn_speed: 0.012,
                    damage: 35.0,
                    fire_rate_ms: 1800.0,
                    credits: 200,
                    shield_regen_per_ms: 0.0,
                },
            ),
        ]);

        let tiers = vec![
            // Opening waves: fast, weak scouts and raiders.
            SpawnTier {
                min_wave: 1,
                table: WeightedTable::new(&[(Gorn, 0.30), (Klingon, 0.70)]),
            },
            SpawnTier {
                min_wave: 3,
                table: WeightedTable::new(&[(Romulan, 0.20), (Gorn, 0.25), (Klingon, 0.55)]),
            },
            SpawnTier {
                min_wave: 5,
                table: WeightedTable::new(&[
                    (Cardassian, 0.15),
                    (Romulan, 0.20),
                    (Gorn, 0.20),
                    (Klingon, 0.45),
                ]),
            },
            // Late waves bring in the Borg.
            SpawnTier {
                min_wave: 8,
                table: WeightedTable::new(&[
                    (Borg, 0.10),
                    (Cardassian, 0.15),
                    (Romulan, 0.20),
                    (Gorn, 0.20),
                    (Klingon, 0.35),
                ]),
            },
        ];

        Self { templates, tiers }
    }
}

/// Stats shared by every allied escort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllyTemplate {
    pub health: f64,
    pub shields: f64,
    pub speed: f64,
    pub turn_speed: f64,
    pub damage: f64,
    pub fire_rate_ms: f64,
    pub names: Vec<String>,
    /// Stations relative to the player, one per name.
    pub formation_offsets: Vec<DVec3>,
}

impl Default for AllyTemplate {
    fn default() -> Self {
        Self {
            health: 80.0,
            shields: 80.0,
            speed: 0.5,
            turn_speed: 0.02,
            damage: 30.0,
            fire_rate_ms: 1500.0,
            names: ["USS Excalibur", "USS Lexington", "USS Defiant", "USS Hood"]
                .map(String::from)
                .to_vec(),
            formation_offsets: vec![
                DVec3::new(-30.0, 0.0, 30.0),
                DVec3::new(30.0, 0.0, 30.0),
                DVec3::new(-55.0, -5.0, 55.0),
                DVec3::new(55.0, -5.0, 55.0),
            ],
        }
    }
}

/// A selectable mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSpec {
    pub name: String,
    pub description: String,
    /// Number of waves to clear; `None` is endless.
    pub waves: Option<u32>,
    pub difficulty: f64,
    #[serde(default)]
    pub allies: u32,
}

/// Missions keyed by their roster key.
pub fn default_missions() -> BTreeMap<String, MissionSpec> {
    let mission = |name: &str, description: &str, waves, difficulty, allies| MissionSpec {
        name: name.to_string(),
        description: description.to_string(),
        waves,
        difficulty,
        allies,
    };
    BTreeMap::from([
        (
            "patrol".to_string(),
            mission("Border Patrol", "Defend the neutral zone from Klingon raiders", Some(5), 1.0, 0),
        ),
        (
            "rescue".to_string(),
            mission(
                "Rescue Mission",
                "Fight through Romulan forces to rescue stranded crew",
                Some(7),
                1.5,
                0,
            ),
        ),
        (
            "assault".to_string(),
            mission("Deep Strike", "Assault enemy staging area", Some(10), 2.0, 0),
        ),
        (
            "fleet".to_string(),
            mission(
                "Fleet Battle",
                "Command a Federation squadron against overwhelming enemy forces",
                Some(8),
                2.5,
                3,
            ),
        ),
        (
            "survival".to_string(),
            mission("Survival", "Survive endless waves of enemies", None, 1.0, 0),
        ),
    ])
}

/// A one-time ship upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub kind: UpgradeKind,
    pub cost: u32,
    /// Increment applied to the stat the upgrade improves.
    pub amount: f64,
}

pub fn default_upgrades() -> Vec<UpgradeSpec> {
    use UpgradeKind::*;
    [
        (HullPlating, 500, 100.0),
        (ShieldBoost, 500, 100.0),
        (PhaserUpgrade, 750, 15.0),
        (TorpedoUpgrade, 1000, 50.0),
        (ExtraTorpedoes, 400, 5.0),
        (EngineBoost, 600, 0.5),
        (WarpCore, 800, 2.0),
        (EnergyCell, 450, 50.0),
    ]
    .into_iter()
    .map(|(kind, cost, amount)| UpgradeSpec { kind, cost, amount })
    .collect()
}
