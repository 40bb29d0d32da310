//! Game content bundle and its loading/validation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{EnemyClass, UpgradeKind};
use crate::registry::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown mission '{0}'")]
    UnknownMission(String),
    #[error("no stat template for enemy class {0:?}")]
    MissingTemplate(EnemyClass),
    #[error("enemy class {class:?}: {reason}")]
    BadTemplate { class: EnemyClass, reason: String },
    #[error("no spawn tier covers wave 1")]
    NoOpeningTier,
    #[error("spawn tier starting at wave {0} has no positive weight")]
    EmptyTier(u32),
    #[error("mission '{key}': {reason}")]
    BadMission { key: String, reason: String },
    #[error("ally template: {0}")]
    BadAllies(String),
    #[error("upgrade {0:?} listed more than once")]
    DuplicateUpgrade(UpgradeKind),
}

/// Everything the simulation treats as content rather than code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub enemies: EnemyRegistry,
    #[serde(default)]
    pub allies: AllyTemplate,
    #[serde(default = "default_missions")]
    pub missions: BTreeMap<String, MissionSpec>,
    #[serde(default = "default_upgrades")]
    pub upgrades: Vec<UpgradeSpec>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            enemies: EnemyRegistry::default(),
            allies: AllyTemplate::default(),
            missions: default_missions(),
            upgrades: default_upgrades(),
        }
    }
}

impl Content {
    /// Parse and validate a JSON content document. Omitted sections use defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    /// Read, parse and validate a JSON content file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn mission(&self, key: &str) -> Result<&MissionSpec, ConfigError> {
        self.missions
            .get(key)
            .ok_or_else(|| ConfigError::UnknownMission(key.to_string()))
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&UpgradeSpec> {
        self.upgrades.iter().find(|u| u.kind == kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&class, t) in &self.enemies.templates {
            let bad = |reason: &str| ConfigError::BadTemplate {
                class,
                reason: reason.to_string(),
            };
            if !(t.health > 0.0) {
                return Err(bad("health must be positive"));
            }
            if !(t.shields >= 0.0) || !(t.shield_regen_per_ms >= 0.0) {
                return Err(bad("shields must not be negative"));
            }
            if !(t.speed >= 0.0) || !(0.0..=1.0).contains(&t.turn_speed) {
                return Err(bad("speed must be non-negative and turn_speed in [0, 1]"));
            }
            if !(t.fire_rate_ms > 0.0) || !(t.damage >= 0.0) {
                return Err(bad("fire rate must be positive and damage non-negative"));
            }
        }

        if !self.enemies.tiers.iter().any(|t| t.min_wave <= 1) {
            return Err(ConfigError::NoOpeningTier);
        }
        for tier in &self.enemies.tiers {
            if tier.table.total_weight() <= 0.0 {
                return Err(ConfigError::EmptyTier(tier.min_wave));
            }
            for entry in &tier.table.entries {
                if entry.weight > 0.0 && self.enemies.template(entry.class).is_none() {
                    return Err(ConfigError::MissingTemplate(entry.class));
                }
            }
        }

        for (key, m) in &self.missions {
            let bad = |reason: &str| ConfigError::BadMission {
                key: key.clone(),
                reason: reason.to_string(),
            };
            if !m.difficulty.is_finite() || m.difficulty <= 0.0 {
                return Err(bad("difficulty must be a positive number"));
            }
            if m.waves == Some(0) {
                return Err(bad("a finite mission needs at least one wave"));
            }
        }

        let a = &self.allies;
        if a.formation_offsets.len() < a.names.len() {
            return Err(ConfigError::BadAllies(
                "every ally name needs a formation offset".into(),
            ));
        }
        if !(a.health > 0.0) || !(a.fire_rate_ms > 0.0) {
            return Err(ConfigError::BadAllies(
                "health and fire rate must be positive".into(),
            ));
        }

        for (i, u) in self.upgrades.iter().enumerate() {
            if self.upgrades[..i].iter().any(|other| other.kind == u.kind) {
                return Err(ConfigError::DuplicateUpgrade(u.kind));
            }
        }
        Ok(())
    }
}
