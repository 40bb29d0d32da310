//! Mission progression state, stored on the engine rather than in the ECS.

use glam::DVec3;

use starfleet_core::enums::MissionPhase;
use starfleet_core::events::MissionSummary;
use starfleet_core::registry::MissionSpec;

/// The mission being flown.
#[derive(Debug, Clone, Default)]
pub struct MissionState {
    /// Roster key, `None` before the first mission.
    pub key: Option<String>,
    pub spec: Option<MissionSpec>,
    pub phase: MissionPhase,
    /// Current wave number, starting at 1. Only ever increases within a mission.
    pub wave: u32,
    /// Hull reached zero and the failure beat is running.
    pub failure_pending: bool,
    pub allies_deployed: u32,
}

impl MissionState {
    pub fn begin(key: &str, spec: MissionSpec) -> Self {
        Self {
            key: Some(key.to_string()),
            spec: Some(spec),
            phase: MissionPhase::WaveActive,
            wave: 1,
            failure_pending: false,
            allies_deployed: 0,
        }
    }

    pub fn max_waves(&self) -> Option<u32> {
        self.spec.as_ref().and_then(|s| s.waves)
    }

    pub fn difficulty(&self) -> f64 {
        self.spec.as_ref().map_or(1.0, |s| s.difficulty)
    }

    /// Whether clearing the current wave number ends the mission.
    pub fn is_final_wave_cleared(&self) -> bool {
        self.max_waves().is_some_and(|max| self.wave > max)
    }
}

/// Running score.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub enemies_destroyed: u32,
    pub waves_completed: u32,
    pub torpedoes_fired: u32,
    pub phasers_fired: u32,
    pub allies_lost: u32,
}

/// Kill-cam focus. Ends with a scheduled `KillCamEnd`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillCam {
    pub focus: DVec3,
    pub ends_at_ms: f64,
}

/// Summary for `MissionEnded`.
pub fn summarize(
    mission: &MissionState,
    score: &ScoreState,
    credits: u32,
    allies_alive: u32,
) -> MissionSummary {
    MissionSummary {
        mission: mission
            .spec
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        waves_completed: score.waves_completed,
        enemies_destroyed: score.enemies_destroyed,
        credits,
        fleet_surviving: (mission.allies_deployed > 0)
            .then_some((allies_alive, mission.allies_deployed)),
    }
}
