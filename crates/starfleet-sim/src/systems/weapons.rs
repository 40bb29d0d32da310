//! Player weapons: phaser hitscan and homing photon torpedoes.

use glam::DVec3;
use hecs::{Entity, World};

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::{ProjectileKind, SubsystemKind, WeaponKind};
use starfleet_core::events::SimEvent;
use starfleet_core::state::reload_remaining_secs;
use starfleet_core::types::{point_to_segment_distance, Transform};

use crate::scheduler::{ScheduledEvent, ScheduledQueue};
use crate::systems::damage::{damage_vessel, Casualty};
use crate::systems::subsystems::ship_efficiency;
use crate::world_setup::{entity_id, spawn_beam, spawn_projectile};

/// Result of pressing the torpedo trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorpedoLaunch {
    Fired(Entity),
    /// Per-shot cooldown still running; silently ignored.
    CoolingDown,
    /// Bay is reloading; refused with a status message.
    Reloading,
    /// Bay was empty; this attempt started the reload.
    ReloadStarted,
}

/// Where both weapons point: the host's aim point, else the locked target,
/// else straight ahead.
pub fn aim_direction(
    world: &World,
    ship: &PlayerShip,
    aim_point: Option<DVec3>,
    lock: Option<Entity>,
) -> DVec3 {
    let origin = ship.transform.position;
    let toward = |point: DVec3| (point - origin).try_normalize();
    aim_point
        .and_then(toward)
        .or_else(|| {
            lock.and_then(|e| world.get::<&Transform>(e).ok().map(|t| t.position))
                .and_then(toward)
        })
        .unwrap_or_else(|| ship.transform.forward())
}

/// Fire the phaser if charged and off cooldown. Every live enemy within the
/// beam tolerance takes damage this tick. Returns whether the beam fired.
#[allow(clippy::too_many_arguments)]
pub fn fire_phaser(
    world: &mut World,
    ship: &mut PlayerShip,
    aim_point: Option<DVec3>,
    lock: Option<Entity>,
    now_ms: f64,
    scheduler: &mut ScheduledQueue,
    events: &mut Vec<SimEvent>,
    casualties: &mut Vec<Casualty>,
) -> bool {
    let bay = &mut ship.weapons;
    if bay.phaser_cooldown_ms > 0.0 || bay.phaser_charge < PHASER_CHARGE_COST {
        return false;
    }
    bay.phaser_cooldown_ms = PHASER_COOLDOWN_MS;
    bay.phaser_charge -= PHASER_CHARGE_COST;

    let damage = ship.weapons.phaser_damage * ship_efficiency(ship, SubsystemKind::Weapons);
    let start = ship.transform.position;
    let end = start + aim_direction(world, ship, aim_point, lock) * PHASER_RANGE;

    let struck: Vec<Entity> = world
        .query::<(&Transform, &EnemyProfile)>()
        .iter()
        .filter(|(_, (t, _))| point_to_segment_distance(t.position, start, end) < BEAM_HIT_TOLERANCE)
        .map(|(e, _)| e)
        .collect();
    for enemy in struck {
        damage_vessel(world, enemy, damage, now_ms, scheduler, events, casualties);
    }

    spawn_beam(world, ProjectileKind::PhaserBeam, start, end);
    events.push(SimEvent::WeaponFired {
        weapon: WeaponKind::Phaser,
    });
    true
}

/// Pull the torpedo trigger. The torpedo leaves along the aim direction and
/// homes on `lock` if there is one.
///
/// Firing on an empty bay starts a 30 s reload; further attempts while
/// reloading neither fire nor touch the running timer.
pub fn fire_torpedo(
    world: &mut World,
    ship: &mut PlayerShip,
    aim_point: Option<DVec3>,
    lock: Option<Entity>,
    now_ms: f64,
    scheduler: &mut ScheduledQueue,
    events: &mut Vec<SimEvent>,
) -> TorpedoLaunch {
    let weapons_efficiency = ship_efficiency(ship, SubsystemKind::Weapons);
    let bay = &mut ship.weapons;
    if bay.torpedo_cooldown_ms > 0.0 {
        return TorpedoLaunch::CoolingDown;
    }
    if let Some(remaining) = reload_remaining_secs(bay.reload, now_ms) {
        events.push(SimEvent::StatusMessage {
            message: format!("Torpedoes reloading: {} seconds remaining", remaining.ceil()),
        });
        return TorpedoLaunch::Reloading;
    }
    if bay.torpedoes == 0 {
        bay.reload = ReloadState::Reloading {
            ready_at_ms: now_ms + TORPEDO_RELOAD_MS,
        };
        scheduler.schedule(now_ms, TORPEDO_RELOAD_MS, ScheduledEvent::TorpedoReloaded);
        tracing::debug!(now_ms, "torpedo bay empty, reloading");
        events.push(SimEvent::TorpedoReloadStarted);
        events.push(SimEvent::StatusMessage {
            message: "Torpedo bay empty. Reloading.".to_string(),
        });
        return TorpedoLaunch::ReloadStarted;
    }

    bay.torpedo_cooldown_ms = TORPEDO_COOLDOWN_MS;
    bay.torpedoes -= 1;
    let damage = bay.torpedo_damage * weapons_efficiency;

    let heading = aim_direction(world, ship, aim_point, lock);
    let torpedo = spawn_projectile(
        world,
        ProjectileKind::Torpedo,
        ship.transform.position,
        heading * TORPEDO_SPEED,
        damage,
        TORPEDO_LIFE_MS,
        lock.map(entity_id),
    );
    events.push(SimEvent::WeaponFired {
        weapon: WeaponKind::Torpedo,
    });
    TorpedoLaunch::Fired(torpedo)
}

/// Scheduled reload completion. A bay that is no longer reloading (the
/// mission was restarted in between) is left alone.
pub fn complete_reload(ship: &mut PlayerShip, events: &mut Vec<SimEvent>) {
    let bay = &mut ship.weapons;
    if matches!(bay.reload, ReloadState::Reloading { .. }) {
        bay.reload = ReloadState::Loaded;
        bay.torpedoes = bay.max_torpedoes;
        events.push(SimEvent::TorpedoReloaded);
    }
}
