//! Per-entity steering decisions for enemies and allies.
//!
//! Inputs are plain snapshots of the entity and its surroundings; outputs are
//! a displacement for this tick plus the facing the entity should turn toward.
//! Speeds are per reference frame and `frames` scales them to the tick length.

use glam::{DQuat, DVec3};

use starfleet_core::constants::*;
use starfleet_core::types::{horizontal_perpendicular, look_rotation};

/// Formation role of an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyRole {
    Leader,
    /// Wingman with its leader's current position, if the leader still lives.
    Wingman {
        leader_position: Option<DVec3>,
        offset: DVec3,
    },
}

/// What an enemy is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyManeuver {
    /// Closing on the player at full speed.
    Close,
    /// Inside the far band: closing at half speed.
    Approach,
    /// Circling the player at right angles.
    Orbit,
    /// Catching up with its formation slot.
    Regroup,
    /// In its formation slot.
    OnStation,
    /// Leaderless wingman chasing the player.
    Pursue,
    /// Leaderless wingman holding at pursuit range.
    Hold,
}

/// Input to the enemy steering function.
pub struct EnemyContext {
    pub role: EnemyRole,
    pub position: DVec3,
    pub speed: f64,
    pub player_position: DVec3,
    /// Length of the tick in reference frames.
    pub frames: f64,
}

/// Desired facing and the per-frame rate to slerp toward it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facing {
    pub target: DQuat,
    pub rate: f64,
}

/// Output of the enemy steering function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySteering {
    pub maneuver: EnemyManeuver,
    pub displacement: DVec3,
}

/// Decide how an enemy moves this tick.
pub fn steer_enemy(ctx: &EnemyContext) -> EnemySteering {
    let to_player = ctx.player_position - ctx.position;
    let distance = to_player.length();
    let step = ctx.speed * ctx.frames;

    let (maneuver, displacement) = match ctx.role {
        EnemyRole::Leader => {
            if distance > LEADER_FAR_RANGE {
                (EnemyManeuver::Close, to_player.normalize_or_zero() * step)
            } else if distance > LEADER_NEAR_RANGE {
                (
                    EnemyManeuver::Approach,
                    to_player.normalize_or_zero() * step * LEADER_APPROACH_FACTOR,
                )
            } else {
                (
                    EnemyManeuver::Orbit,
                    horizontal_perpendicular(to_player) * step * ORBIT_SPEED_FACTOR,
                )
            }
        }
        EnemyRole::Wingman {
            leader_position: Some(leader),
            offset,
        } => {
            let to_slot = leader + offset - ctx.position;
            if to_slot.length() > WINGMAN_SLACK {
                (
                    EnemyManeuver::Regroup,
                    to_slot.normalize_or_zero() * step * WINGMAN_SPEED_FACTOR,
                )
            } else {
                (EnemyManeuver::OnStation, DVec3::ZERO)
            }
        }
        EnemyRole::Wingman {
            leader_position: None,
            ..
        } => {
            if distance > LEADERLESS_PURSUIT_RANGE {
                (EnemyManeuver::Pursue, to_player.normalize_or_zero() * step)
            } else {
                (EnemyManeuver::Hold, DVec3::ZERO)
            }
        }
    };

    EnemySteering {
        maneuver,
        displacement,
    }
}

/// Enemies always turn to face the player at their own turn speed.
pub fn enemy_facing(position: DVec3, player_position: DVec3, turn_speed: f64) -> Option<Facing> {
    look_rotation(position, player_position).map(|target| Facing {
        target,
        rate: turn_speed,
    })
}

/// Whether an enemy's weapon is ready and the player is in range.
pub fn enemy_should_fire(now_ms: f64, last_fire_ms: f64, fire_rate_ms: f64, distance: f64) -> bool {
    now_ms - last_fire_ms > fire_rate_ms && distance < ENEMY_ENGAGE_RANGE
}

/// What an ally is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllyManeuver {
    /// Broke formation, closing on an enemy.
    Engage,
    /// Broke formation, circling an enemy at close range.
    Strafe,
    /// Easing back toward its station beside the player.
    Regroup,
    /// On station, matching the player's heading.
    OnStation,
}

/// Input to the ally steering function.
pub struct AllyContext {
    pub position: DVec3,
    pub speed: f64,
    pub turn_speed: f64,
    /// Nearest live enemy position and distance.
    pub nearest_enemy: Option<(DVec3, f64)>,
    pub player_position: DVec3,
    pub player_orientation: DQuat,
    /// Station in the player's local frame.
    pub formation_offset: DVec3,
    pub frames: f64,
}

/// Output of the ally steering function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllySteering {
    pub maneuver: AllyManeuver,
    pub displacement: DVec3,
    pub facing: Option<Facing>,
    /// Engaged enemy is inside beam range.
    pub in_fire_range: bool,
}

impl AllySteering {
    pub fn is_engaging(&self) -> bool {
        matches!(self.maneuver, AllyManeuver::Engage | AllyManeuver::Strafe)
    }
}

/// Decide how an ally moves this tick.
pub fn steer_ally(ctx: &AllyContext) -> AllySteering {
    let step = ctx.speed * ctx.frames;

    if let Some((enemy, distance)) = ctx.nearest_enemy.filter(|&(_, d)| d < ALLY_ENGAGE_RANGE) {
        let to_enemy = enemy - ctx.position;
        let facing = look_rotation(ctx.position, enemy).map(|target| Facing {
            target,
            rate: ctx.turn_speed,
        });
        let (maneuver, displacement) = if distance > ALLY_ORBIT_RANGE {
            (AllyManeuver::Engage, to_enemy.normalize_or_zero() * step)
        } else {
            (
                AllyManeuver::Strafe,
                horizontal_perpendicular(to_enemy) * step * ORBIT_SPEED_FACTOR,
            )
        };
        return AllySteering {
            maneuver,
            displacement,
            facing,
            in_fire_range: distance < ALLY_FIRE_RANGE,
        };
    }

    let station = ctx.player_position + ctx.player_orientation * ctx.formation_offset;
    let to_station = station - ctx.position;
    let gap = to_station.length();

    if gap > ALLY_FORMATION_SLACK {
        // Ease in: never faster than boosted cruise, slower as the gap closes.
        let per_frame = (ctx.speed * ALLY_FORMATION_SPEED_FACTOR).min(gap * ALLY_FORMATION_EASE);
        let travel = (per_frame * ctx.frames).min(gap);
        AllySteering {
            maneuver: AllyManeuver::Regroup,
            displacement: to_station.normalize_or_zero() * travel,
            facing: look_rotation(ctx.position, station).map(|target| Facing {
                target,
                rate: ctx.turn_speed * ALLY_FORMATION_TURN_FACTOR,
            }),
            in_fire_range: false,
        }
    } else {
        AllySteering {
            maneuver: AllyManeuver::OnStation,
            displacement: DVec3::ZERO,
            facing: Some(Facing {
                target: ctx.player_orientation,
                rate: ALLY_HEADING_MATCH_RATE,
            }),
            in_fire_range: false,
        }
    }
}
