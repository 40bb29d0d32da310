//! Damage resolution: shields absorb first, the remainder goes to the hull.
//!
//! The player has a few extras on top of the shared rule: the shield generators'
//! efficiency scales absorption, a single hit can take at most 4% of max hull,
//! and every hull hit spills into a random subsystem.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::{EnemyClass, SubsystemKind};
use starfleet_core::events::{HitTarget, SimEvent};
use starfleet_core::types::Transform;

use crate::scheduler::{ScheduledEvent, ScheduledQueue};
use crate::systems::subsystems::{damage_system, ship_efficiency};
use crate::world_setup::entity_id;

/// Outcome of one damage application.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AppliedDamage {
    pub shield_absorbed: f64,
    /// Damage dealt to the hull, which may exceed what was left of it.
    pub hull_absorbed: f64,
    pub destroyed: bool,
}

/// A vessel removed from the world this tick, waiting for its destruction
/// effects to be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Casualty {
    Enemy {
        id: EntityId,
        class: EnemyClass,
        credits: u32,
        position: DVec3,
    },
    Ally {
        name: String,
        position: DVec3,
    },
}

/// Shared shield-then-hull rule. Stored values never go below zero.
pub fn absorb(
    shields: &mut f64,
    health: &mut f64,
    raw: f64,
    shield_efficiency: f64,
    shields_up: bool,
    hull_cap: Option<f64>,
) -> AppliedDamage {
    let raw = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, f64::MAX) };

    let mut shield_absorbed = 0.0;
    if shields_up && *shields > 0.0 {
        shield_absorbed = (raw * shield_efficiency.clamp(0.0, 1.0)).min(*shields);
        *shields = (*shields - shield_absorbed).max(0.0);
    }

    let remaining = raw - shield_absorbed;
    let hull_absorbed = match hull_cap {
        Some(cap) => remaining.min(cap.max(0.0)),
        None => remaining,
    };
    if hull_absorbed > 0.0 {
        *health = (*health - hull_absorbed).max(0.0);
    }

    AppliedDamage {
        shield_absorbed,
        hull_absorbed,
        destroyed: *health <= 0.0,
    }
}

/// Apply a hit to the player ship.
pub fn damage_player(
    ship: &mut PlayerShip,
    raw: f64,
    rng: &mut ChaCha8Rng,
    breaches: &mut Vec<HullBreach>,
    events: &mut Vec<SimEvent>,
) -> AppliedDamage {
    let shield_efficiency = ship_efficiency(ship, SubsystemKind::Shields);
    let cap = ship.max_hull * PLAYER_HULL_HIT_CAP;
    let applied = absorb(
        &mut ship.shields,
        &mut ship.hull,
        raw,
        shield_efficiency,
        ship.shields_active,
        Some(cap),
    );

    if applied.shield_absorbed > 0.0 {
        ship.shield_flash_ms = SHIELD_FLASH_MS;
        events.push(SimEvent::ShieldHit {
            target: HitTarget::Player,
        });
        report_shield_level(ship, events);
    }

    if applied.hull_absorbed > 0.0 {
        events.push(SimEvent::HullHit {
            target: HitTarget::Player,
        });

        let system = SubsystemKind::ALL[rng.gen_range(0..SubsystemKind::ALL.len())];
        damage_system(
            &mut ship.subsystems,
            system,
            applied.hull_absorbed * SYSTEM_DAMAGE_SHARE,
            events,
        );

        if rng.gen::<f64>() < HULL_BREACH_CHANCE {
            let offset = DVec3::new(
                (rng.gen::<f64>() - 0.5) * 15.0,
                (rng.gen::<f64>() - 0.5) * 5.0,
                (rng.gen::<f64>() - 0.5) * 20.0,
            );
            breaches.push(HullBreach {
                offset,
                life_ms: HULL_BREACH_LIFE_MS,
            });
            events.push(SimEvent::HullBreach);
        }

        let percent = hull_percent(ship);
        if (46..=50).contains(&percent) || (21..=25).contains(&percent) {
            events.push(SimEvent::HullIntegrity { percent });
        }
    }

    applied
}

fn hull_percent(ship: &PlayerShip) -> u32 {
    if ship.max_hull <= 0.0 {
        return 0;
    }
    (ship.hull / ship.max_hull * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Crew shield report: once per threshold on the way down, re-armed after
/// shields recover 20 points above the last report.
fn report_shield_level(ship: &mut PlayerShip, events: &mut Vec<SimEvent>) {
    if ship.max_shields <= 0.0 {
        return;
    }
    let percent = (ship.shields / ship.max_shields * 100.0).round().clamp(0.0, 100.0) as u32;
    for threshold in SHIELD_REPORT_THRESHOLDS {
        if percent <= threshold && ship.last_shield_report > threshold {
            ship.last_shield_report = percent;
            events.push(SimEvent::ShieldThresholdCrossed { percent });
            break;
        }
    }
    if percent > ship.last_shield_report + SHIELD_REPORT_REARM {
        ship.last_shield_report = percent;
    }
}

/// Apply a hit to an enemy or ally. `None` if the entity is gone.
///
/// A vessel reduced to zero health is despawned before this returns and
/// recorded in `casualties`, so later hit tests in the same tick cannot see it.
pub fn damage_vessel(
    world: &mut World,
    entity: Entity,
    raw: f64,
    now_ms: f64,
    scheduler: &mut ScheduledQueue,
    events: &mut Vec<SimEvent>,
    casualties: &mut Vec<Casualty>,
) -> Option<AppliedDamage> {
    let id = entity_id(entity);
    let target = if world.get::<&EnemyProfile>(entity).is_ok() {
        HitTarget::Enemy(id)
    } else if world.get::<&AllyProfile>(entity).is_ok() {
        HitTarget::Ally(id)
    } else {
        return None;
    };

    let (applied, shields_down) = {
        let mut defenses = world.get::<&mut Defenses>(entity).ok()?;
        let defenses = &mut *defenses;
        let had_shields = defenses.shields > 0.0;
        let applied = absorb(
            &mut defenses.shields,
            &mut defenses.health,
            raw,
            1.0,
            true,
            None,
        );
        if applied.shield_absorbed > 0.0 {
            defenses.shield_flash = true;
        }
        (applied, had_shields && defenses.shields <= 0.0)
    };

    if applied.shield_absorbed > 0.0 {
        events.push(SimEvent::ShieldHit { target });
        scheduler.schedule(now_ms, SHIELD_FLASH_MS, ScheduledEvent::ShieldFlashEnd { entity: id });
    }
    if applied.hull_absorbed > 0.0 {
        events.push(SimEvent::HullHit { target });
    }
    if shields_down {
        if let HitTarget::Enemy(enemy) = target {
            events.push(SimEvent::EnemyShieldsDown { enemy });
        }
    }
    if applied.destroyed {
        destroy_vessel(world, entity, casualties);
    }
    Some(applied)
}

/// Remove a vessel from the world and record it as a casualty.
pub fn destroy_vessel(world: &mut World, entity: Entity, casualties: &mut Vec<Casualty>) {
    let position = world
        .get::<&Transform>(entity)
        .map(|t| t.position)
        .unwrap_or_default();
    let casualty = if let Ok(profile) = world.get::<&EnemyProfile>(entity) {
        Some(Casualty::Enemy {
            id: entity_id(entity),
            class: profile.class,
            credits: profile.credits,
            position,
        })
    } else if let Ok(profile) = world.get::<&AllyProfile>(entity) {
        Some(Casualty::Ally {
            name: profile.name.clone(),
            position,
        })
    } else {
        None
    };

    if world.despawn(entity).is_ok() {
        casualties.extend(casualty);
    }
}
