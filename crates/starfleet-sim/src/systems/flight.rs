//! Player flight and ship upkeep: throttle, warp, steering, autopilot,
//! regeneration, cooldowns and held repair.

use glam::{DQuat, DVec3, EulerRot};

use starfleet_core::commands::PlayerInput;
use starfleet_core::components::PlayerShip;
use starfleet_core::constants::*;
use starfleet_core::enums::{SubsystemKind, Throttle};
use starfleet_core::events::SimEvent;
use starfleet_core::types::{frames, without_roll};

use crate::systems::subsystems::{fully_repaired, repair_all, ship_efficiency};

/// Advance the player ship by `dt_ms`.
///
/// `lock_position` is the locked target's position, used by the autopilot.
pub fn run(
    ship: &mut PlayerShip,
    input: &PlayerInput,
    lock_position: Option<DVec3>,
    dt_ms: f64,
    events: &mut Vec<SimEvent>,
) {
    let f = frames(dt_ms);

    apply_throttle(ship, input.throttle, f);
    apply_warp(ship, input.warp, dt_ms, f);

    match lock_position.filter(|_| ship.autopilot) {
        Some(target) => autopilot(ship, target, f),
        None => steer(ship, input.yaw, input.pitch, f),
    }

    let impulse = ship.speed * ship_efficiency(ship, SubsystemKind::Engines);
    let warp = ship.warp * WARP_SPEED_FACTOR * ship_efficiency(ship, SubsystemKind::WarpCore);
    let forward = ship.transform.forward();
    ship.transform.position += forward * (impulse + warp) * f;

    regenerate(ship, dt_ms);

    if input.repair && ship.energy > REPAIR_MIN_ENERGY && repair_all(ship, f) {
        ship.energy = (ship.energy - REPAIR_ENERGY_PER_MS * dt_ms).max(0.0);
        if fully_repaired(ship) {
            tracing::debug!("all systems repaired");
            events.push(SimEvent::SystemsRepaired);
        }
    }
}

fn apply_throttle(ship: &mut PlayerShip, throttle: Throttle, f: f64) {
    ship.speed = match throttle {
        Throttle::Hold => ship.speed,
        Throttle::Accelerate => (ship.speed + THROTTLE_STEP * f).min(ship.max_speed),
        Throttle::Decelerate => (ship.speed - THROTTLE_STEP * f).max(0.0),
        Throttle::Stop => 0.0,
    };
}

fn apply_warp(ship: &mut PlayerShip, engaged: bool, dt_ms: f64, f: f64) {
    if engaged && ship.energy > 0.0 {
        ship.warp = (ship.warp + WARP_ACCEL * f).min(ship.max_warp);
        ship.energy = (ship.energy - WARP_ENERGY_PER_MS * dt_ms).max(0.0);
    } else {
        ship.warp = (ship.warp - WARP_DECAY * f).max(0.0);
    }
}

/// Pointer steering: yaw about world up, pitch about the ship's right axis.
fn steer(ship: &mut PlayerShip, yaw: f64, pitch: f64, f: f64) {
    let yaw = DQuat::from_rotation_y(-yaw * TURN_RATE * f);
    let pitch = DQuat::from_rotation_x(pitch * TURN_RATE * f);
    ship.transform.orientation = without_roll(yaw * ship.transform.orientation * pitch).normalize();
}

/// Turn toward the target and bring speed up to cruise.
fn autopilot(ship: &mut PlayerShip, target: DVec3, f: f64) {
    let orientation = ship.transform.orientation;
    if let Some(direction) = (target - ship.transform.position).try_normalize() {
        // Target direction in the ship's frame: -Z ahead, +X right, +Y up.
        let local = orientation.inverse() * direction;
        let (yaw, pitch, _) = orientation.to_euler(EulerRot::YXZ);
        let yaw = yaw - local.x * AUTOPILOT_YAW_GAIN * f;
        let pitch = (pitch + local.y * AUTOPILOT_PITCH_GAIN * f)
            .clamp(-AUTOPILOT_PITCH_LIMIT, AUTOPILOT_PITCH_LIMIT);
        ship.transform.orientation = DQuat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
    }

    let cruise = ship.max_speed * AUTOPILOT_SPEED_FRACTION;
    if ship.speed < cruise {
        ship.speed = (ship.speed + AUTOPILOT_THROTTLE_STEP * f).min(cruise);
    }
}

fn regenerate(ship: &mut PlayerShip, dt_ms: f64) {
    let weapons = ship_efficiency(ship, SubsystemKind::Weapons);
    let shields = ship_efficiency(ship, SubsystemKind::Shields);

    let bay = &mut ship.weapons;
    bay.phaser_charge = (bay.phaser_charge + PHASER_CHARGE_PER_MS * weapons * dt_ms).min(PHASER_CHARGE_MAX);
    bay.phaser_cooldown_ms = (bay.phaser_cooldown_ms - dt_ms).max(0.0);
    bay.torpedo_cooldown_ms = (bay.torpedo_cooldown_ms - dt_ms).max(0.0);

    if ship.shields_active {
        ship.shields = (ship.shields + SHIELD_REGEN_PER_MS * shields * dt_ms).min(ship.max_shields);
    }
    ship.energy = (ship.energy + ENERGY_REGEN_PER_MS * dt_ms).min(ship.max_energy);
    ship.shield_flash_ms = (ship.shield_flash_ms - dt_ms).max(0.0);
}
