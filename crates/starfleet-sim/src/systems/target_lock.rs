//! Target lock: the nearest enemy ahead of the ship within lock range.

use hecs::{Entity, World};

use starfleet_core::components::{EnemyProfile, PlayerShip};
use starfleet_core::constants::*;
use starfleet_core::events::SimEvent;
use starfleet_core::types::Transform;

use crate::world_setup::entity_id;

/// Re-evaluate the lock. Emits `TargetLocked` when a lock is acquired from none;
/// a held lock on a vessel that is no longer alive counts as none.
pub fn run(world: &World, ship: &PlayerShip, lock: &mut Option<Entity>, events: &mut Vec<SimEvent>) {
    let origin = ship.transform.position;
    let forward = ship.transform.forward();
    let min_cos = TARGET_LOCK_HALF_ANGLE.cos();

    let nearest = world
        .query::<(&Transform, &EnemyProfile)>()
        .iter()
        .filter_map(|(e, (t, _))| {
            let offset = t.position - origin;
            let distance = offset.length();
            let ahead = offset
                .try_normalize()
                .is_some_and(|dir| dir.dot(forward) > min_cos);
            (distance < TARGET_LOCK_RANGE && ahead).then_some((e, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e);

    let held = lock.filter(|e| world.get::<&EnemyProfile>(*e).is_ok());
    if held.is_none() {
        if let Some(enemy) = nearest {
            events.push(SimEvent::TargetLocked {
                enemy: entity_id(enemy),
            });
        }
    }
    *lock = nearest;
}
