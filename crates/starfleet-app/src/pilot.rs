//! Scripted pilot for headless runs.
//!
//! Reads each snapshot and answers with held input plus any discrete
//! commands: keep the autopilot and shields on, sweep for contacts when
//! nothing is locked, fire on the locked target and hold repair while damaged.

use starfleet_core::commands::{PlayerCommand, PlayerInput};
use starfleet_core::constants::PHASER_RANGE;
use starfleet_core::enums::{GamePhase, Throttle};
use starfleet_core::state::GameStateSnapshot;

/// Ticks to wait before repeating a toggle the snapshot has not caught up with.
const TOGGLE_RETRY_TICKS: u64 = 30;
const TORPEDO_INTERVAL_TICKS: u64 = 90;
const TORPEDO_RANGE: f64 = 400.0;
/// Yaw held while searching for a target.
const SEARCH_YAW: f64 = 0.5;
const REPAIR_HULL_FRACTION: f64 = 0.6;
const REPAIR_SUBSYSTEM_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct ScriptedPilot {
    last_autopilot_toggle: Option<u64>,
    last_shield_toggle: Option<u64>,
    last_torpedo: Option<u64>,
}

fn due(last: Option<u64>, now: u64, interval: u64) -> bool {
    last.map_or(true, |t| now.saturating_sub(t) >= interval)
}

impl ScriptedPilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input and commands for the tick after `snapshot`.
    pub fn decide(&mut self, snapshot: &GameStateSnapshot) -> (PlayerInput, Vec<PlayerCommand>) {
        let mut commands = Vec::new();
        if snapshot.phase != GamePhase::Active {
            return (PlayerInput::default(), commands);
        }
        let tick = snapshot.time.tick;
        let ship = &snapshot.ship;

        if !ship.autopilot && due(self.last_autopilot_toggle, tick, TOGGLE_RETRY_TICKS) {
            self.last_autopilot_toggle = Some(tick);
            commands.push(PlayerCommand::ToggleAutopilot);
        }
        if !ship.shields_active && due(self.last_shield_toggle, tick, TOGGLE_RETRY_TICKS) {
            self.last_shield_toggle = Some(tick);
            commands.push(PlayerCommand::ToggleShields);
        }

        let damaged = ship.hull < ship.max_hull * REPAIR_HULL_FRACTION
            || snapshot
                .subsystems
                .iter()
                .any(|s| s.health < s.max_health * REPAIR_SUBSYSTEM_FRACTION);

        let mut input = PlayerInput {
            throttle: Throttle::Hold,
            repair: damaged,
            ..Default::default()
        };

        match &snapshot.target_lock {
            Some(lock) => {
                input.fire_phaser = lock.distance < PHASER_RANGE;
                let torpedo_ready = ship.torpedoes > 0 && ship.reload_remaining_secs.is_none();
                if torpedo_ready
                    && lock.distance < TORPEDO_RANGE
                    && due(self.last_torpedo, tick, TORPEDO_INTERVAL_TICKS)
                {
                    self.last_torpedo = Some(tick);
                    commands.push(PlayerCommand::FireTorpedo);
                }
            }
            None => {
                input.yaw = SEARCH_YAW;
                input.throttle = Throttle::Accelerate;
            }
        }

        (input, commands)
    }
}
