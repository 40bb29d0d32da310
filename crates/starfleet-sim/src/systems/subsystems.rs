//! Subsystem damage, efficiency and repair.

use starfleet_core::components::{PlayerShip, Subsystem, Subsystems};
use starfleet_core::constants::*;
use starfleet_core::enums::SubsystemKind;
use starfleet_core::events::SimEvent;

/// Performance multiplier for a subsystem: `0.3 + 0.7 * health / max`.
pub fn efficiency(subsystem: &Subsystem) -> f64 {
    if subsystem.max_health <= 0.0 {
        return SUBSYSTEM_MIN_EFFICIENCY;
    }
    let fraction = (subsystem.health / subsystem.max_health).clamp(0.0, 1.0);
    SUBSYSTEM_MIN_EFFICIENCY + (1.0 - SUBSYSTEM_MIN_EFFICIENCY) * fraction
}

pub fn ship_efficiency(ship: &PlayerShip, kind: SubsystemKind) -> f64 {
    efficiency(ship.subsystems.get(kind))
}

/// Damage one subsystem, reporting each threshold it crosses on the way down.
///
/// A single hit that takes a healthy system straight to zero reports both
/// failing and offline.
pub fn damage_system(
    subsystems: &mut Subsystems,
    kind: SubsystemKind,
    amount: f64,
    events: &mut Vec<SimEvent>,
) {
    if !(amount > 0.0) {
        return;
    }
    let system = subsystems.get_mut(kind);
    let before = system.health;
    system.health = (system.health - amount).clamp(0.0, system.max_health);
    debug_assert!((0.0..=system.max_health).contains(&system.health));

    if before >= SUBSYSTEM_FAILING_THRESHOLD && system.health < SUBSYSTEM_FAILING_THRESHOLD {
        tracing::debug!(system = ?kind, health = system.health, "subsystem failing");
        events.push(SimEvent::SystemFailing { system: kind });
    }
    if before > 0.0 && system.health <= 0.0 {
        tracing::debug!(system = ?kind, "subsystem offline");
        events.push(SimEvent::SystemOffline { system: kind });
    }
}

/// One step of damage control: every subsystem and the hull move toward full
/// by a fixed per-frame step. Returns whether anything was repaired.
pub fn repair_all(ship: &mut PlayerShip, frames: f64) -> bool {
    let mut repaired = false;
    for system in ship.subsystems.0.iter_mut() {
        if system.health < system.max_health {
            system.health = (system.health + SUBSYSTEM_REPAIR_STEP * frames).min(system.max_health);
            repaired = true;
        }
    }
    if ship.hull < ship.max_hull {
        ship.hull = (ship.hull + HULL_REPAIR_STEP * frames).min(ship.max_hull);
        repaired = true;
    }
    repaired
}

/// Whether the hull and every subsystem are at full health.
pub fn fully_repaired(ship: &PlayerShip) -> bool {
    ship.hull >= ship.max_hull && ship.subsystems.0.iter().all(|s| s.health >= s.max_health)
}
