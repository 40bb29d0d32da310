//! Simulation constants and tuning parameters.
//!
//! Movement values are given per reference frame (60 Hz) the way the game was
//! tuned; systems scale them by `types::frames(dt_ms)`. Timers are milliseconds.

/// Reference frame length in milliseconds.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest delta a single tick will integrate. Longer frames are clamped.
pub const MAX_FRAME_MS: f64 = 100.0;

// --- Player ship ---

pub const PLAYER_MAX_HULL: f64 = 500.0;
pub const PLAYER_MAX_SHIELDS: f64 = 200.0;
pub const PLAYER_MAX_ENERGY: f64 = 100.0;
pub const PLAYER_MAX_TORPEDOES: u32 = 72;
pub const PLAYER_PHASER_DAMAGE: f64 = 50.0;
pub const PLAYER_TORPEDO_DAMAGE: f64 = 200.0;
/// Impulse speed cap (units per frame).
pub const PLAYER_MAX_SPEED: f64 = 2.0;
pub const PLAYER_MAX_WARP: f64 = 9.0;

/// Throttle change per frame.
pub const THROTTLE_STEP: f64 = 0.05;
pub const WARP_ACCEL: f64 = 0.05;
pub const WARP_DECAY: f64 = 0.1;
/// Units per frame contributed by each warp factor.
pub const WARP_SPEED_FACTOR: f64 = 5.0;
/// Energy drained per ms while warp is held.
pub const WARP_ENERGY_PER_MS: f64 = 0.02;
/// Maximum yaw/pitch rate at full pointer deflection (radians per frame).
pub const TURN_RATE: f64 = 0.045;
/// Autopilot yaw / pitch gains.
pub const AUTOPILOT_YAW_GAIN: f64 = 0.025;
pub const AUTOPILOT_PITCH_GAIN: f64 = 0.015;
pub const AUTOPILOT_PITCH_LIMIT: f64 = 0.4;
pub const AUTOPILOT_SPEED_FRACTION: f64 = 0.7;
pub const AUTOPILOT_THROTTLE_STEP: f64 = 0.01;

// --- Regeneration (per ms) ---

pub const PHASER_CHARGE_MAX: f64 = 100.0;
pub const PHASER_CHARGE_PER_MS: f64 = 0.015;
pub const SHIELD_REGEN_PER_MS: f64 = 0.005;
pub const ENERGY_REGEN_PER_MS: f64 = 0.01;
pub const ALLY_SHIELD_REGEN_PER_MS: f64 = 0.003;

// --- Damage ---

/// Fraction of max hull the player can lose to a single hit.
pub const PLAYER_HULL_HIT_CAP: f64 = 0.04;
/// Share of hull damage passed on to a random subsystem.
pub const SYSTEM_DAMAGE_SHARE: f64 = 0.5;
pub const HULL_BREACH_CHANCE: f64 = 0.3;
pub const HULL_BREACH_LIFE_MS: f64 = 10_000.0;
/// Breaches seal once hull is back above this fraction of max.
pub const HULL_BREACH_SEAL_FRACTION: f64 = 0.8;
pub const SHIELD_FLASH_MS: f64 = 150.0;
/// Delay between hull reaching zero and the mission-failed transition.
pub const GAME_OVER_DELAY_MS: f64 = 2000.0;

// --- Subsystems ---

pub const SUBSYSTEM_MAX_HEALTH: f64 = 100.0;
pub const SUBSYSTEM_FAILING_THRESHOLD: f64 = 30.0;
pub const SUBSYSTEM_MIN_EFFICIENCY: f64 = 0.3;
pub const SUBSYSTEM_REPAIR_STEP: f64 = 0.05;
pub const HULL_REPAIR_STEP: f64 = 0.1;
/// Repairs only run while energy is above this.
pub const REPAIR_MIN_ENERGY: f64 = 10.0;
pub const REPAIR_ENERGY_PER_MS: f64 = 0.02;

// --- Weapons ---

pub const PHASER_COOLDOWN_MS: f64 = 200.0;
pub const PHASER_CHARGE_COST: f64 = 10.0;
pub const PHASER_RANGE: f64 = 500.0;
/// Lateral distance from a beam within which a target is hit.
pub const BEAM_HIT_TOLERANCE: f64 = 15.0;
/// Lifetime of the beam record left for the renderer.
pub const BEAM_LIFE_MS: f64 = 300.0;

pub const TORPEDO_COOLDOWN_MS: f64 = 1000.0;
pub const TORPEDO_RELOAD_MS: f64 = 30_000.0;
/// Units per frame.
pub const TORPEDO_SPEED: f64 = 5.0;
pub const TORPEDO_LIFE_MS: f64 = 3000.0;
/// Per-frame blend of torpedo velocity toward its target.
pub const TORPEDO_HOMING_RATE: f64 = 0.12;
pub const TORPEDO_HIT_RADIUS: f64 = 10.0;

/// Units per frame.
pub const ENEMY_SHOT_SPEED: f64 = 3.0;
pub const ENEMY_SHOT_LIFE_MS: f64 = 5000.0;
pub const ENEMY_SHOT_PLAYER_RADIUS: f64 = 15.0;
pub const ENEMY_SHOT_ALLY_RADIUS: f64 = 12.0;

// --- Targeting ---

pub const TARGET_LOCK_RANGE: f64 = 1000.0;
pub const TARGET_LOCK_HALF_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

// --- Enemy AI ---

/// Leaders close at full speed beyond this distance.
pub const LEADER_FAR_RANGE: f64 = 150.0;
/// Leaders orbit inside this distance.
pub const LEADER_NEAR_RANGE: f64 = 80.0;
pub const LEADER_APPROACH_FACTOR: f64 = 0.5;
pub const ORBIT_SPEED_FACTOR: f64 = 0.4;
pub const WINGMAN_SLACK: f64 = 5.0;
pub const WINGMAN_SPEED_FACTOR: f64 = 1.2;
/// Leaderless wingmen stop closing inside this distance.
pub const LEADERLESS_PURSUIT_RANGE: f64 = 100.0;
pub const ENEMY_ENGAGE_RANGE: f64 = 500.0;
pub const ENEMY_ANNOUNCE_RANGE: f64 = 500.0;

// --- Ally AI ---

pub const ALLY_ENGAGE_RANGE: f64 = 200.0;
pub const ALLY_ORBIT_RANGE: f64 = 80.0;
pub const ALLY_FIRE_RANGE: f64 = 350.0;
pub const ALLY_BEAM_LENGTH: f64 = 350.0;
pub const ALLY_FORMATION_SLACK: f64 = 5.0;
pub const ALLY_FORMATION_SPEED_FACTOR: f64 = 1.5;
/// Fraction of the remaining gap an ally closes per frame while regrouping.
pub const ALLY_FORMATION_EASE: f64 = 0.05;
pub const ALLY_FORMATION_TURN_FACTOR: f64 = 1.5;
/// Slerp rate used to match the player's heading once in position.
pub const ALLY_HEADING_MATCH_RATE: f64 = 0.05;
pub const MAX_ALLIES: usize = 4;

// --- Mission director ---

pub const WAVE_BASE_ENEMIES: f64 = 4.0;
pub const WAVE_ENEMIES_PER_WAVE: f64 = 2.0;
pub const MAX_FORMATION_GROUPS: u32 = 3;
/// Extra bearing between successive groups (radians).
pub const GROUP_BEARING_SPREAD: f64 = std::f64::consts::PI * 0.6;
pub const GROUP_SPAWN_DISTANCE: f64 = 550.0;
pub const FORMATION_SIDE_SPACING: f64 = 25.0;
pub const FORMATION_ROW_SPACING: f64 = 35.0;
pub const SPAWN_ALTITUDE_JITTER: f64 = 10.0;
pub const WAVE_CLEAR_PAUSE_MS: f64 = 3000.0;

// --- Presentation hints ---

pub const KILL_CAM_CHANCE: f64 = 0.3;
pub const KILL_CAM_DURATION_MS: f64 = 1500.0;
/// Shield percentages that trigger a crew report when crossed downward.
pub const SHIELD_REPORT_THRESHOLDS: [u32; 4] = [75, 50, 25, 10];
/// Shields must recover this many points above the last report to re-arm.
pub const SHIELD_REPORT_REARM: u32 = 20;
