//! Projectile integration, homing, hit tests and expiry.
//!
//! Projectiles are processed one at a time against the live world: a vessel
//! destroyed by one projectile is already gone when the next is tested.
//! Moving projectiles test the segment swept this tick, so a long frame
//! cannot tunnel through a target.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::ProjectileKind;
use starfleet_core::events::SimEvent;
use starfleet_core::types::{frame_rate_factor, frames, point_to_segment_distance, Transform};

use crate::scheduler::ScheduledQueue;
use crate::systems::damage::{damage_player, damage_vessel, Casualty};
use crate::world_setup::live_enemy;

/// Advance every projectile by `dt_ms`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    ship: &mut PlayerShip,
    dt_ms: f64,
    now_ms: f64,
    rng: &mut ChaCha8Rng,
    breaches: &mut Vec<HullBreach>,
    scheduler: &mut ScheduledQueue,
    events: &mut Vec<SimEvent>,
    casualties: &mut Vec<Casualty>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let projectiles: Vec<Entity> = world
        .query::<&Projectile>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    let f = frames(dt_ms);

    for entity in projectiles {
        let Ok(mut projectile) = world.get::<&Projectile>(entity).map(|p| *p) else {
            continue;
        };
        projectile.life_ms -= dt_ms;

        let finished = match projectile.kind {
            ProjectileKind::PhaserBeam | ProjectileKind::AllyBeam => false,
            ProjectileKind::Torpedo => {
                let Some((start, end)) = steer_and_move(world, entity, &mut projectile, dt_ms, f)
                else {
                    continue;
                };
                let hit = first_along::<EnemyProfile>(world, start, end, TORPEDO_HIT_RADIUS);
                match hit {
                    Some(enemy) => {
                        damage_vessel(
                            world,
                            enemy,
                            projectile.damage,
                            now_ms,
                            scheduler,
                            events,
                            casualties,
                        );
                        true
                    }
                    None => false,
                }
            }
            ProjectileKind::EnemyShot => {
                let Some((start, end)) = steer_and_move(world, entity, &mut projectile, dt_ms, f)
                else {
                    continue;
                };
                if point_to_segment_distance(ship.transform.position, start, end)
                    < ENEMY_SHOT_PLAYER_RADIUS
                {
                    damage_player(ship, projectile.damage, rng, breaches, events);
                    true
                } else {
                    let hit =
                        first_along::<AllyProfile>(world, start, end, ENEMY_SHOT_ALLY_RADIUS);
                    match hit {
                        Some(ally) => {
                            damage_vessel(
                                world,
                                ally,
                                projectile.damage,
                                now_ms,
                                scheduler,
                                events,
                                casualties,
                            );
                            true
                        }
                        None => false,
                    }
                }
            }
        };

        if finished || projectile.life_ms <= 0.0 {
            despawn_buffer.push(entity);
        } else if let Ok(mut stored) = world.get::<&mut Projectile>(entity) {
            *stored = projectile;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// The vessel tagged `T` within `radius` of the swept segment that lies
/// closest to `start`.
fn first_along<T: hecs::Component>(
    world: &World,
    start: DVec3,
    end: DVec3,
    radius: f64,
) -> Option<Entity> {
    world
        .query::<(&Transform, &T)>()
        .iter()
        .filter(|(_, (t, _))| point_to_segment_distance(t.position, start, end) < radius)
        .map(|(e, (t, _))| (e, t.position.distance_squared(start)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Home (torpedoes only) and integrate one projectile. Returns the segment it
/// swept this tick, or `None` if the entity lacks a body.
fn steer_and_move(
    world: &mut World,
    entity: Entity,
    projectile: &mut Projectile,
    dt_ms: f64,
    f: f64,
) -> Option<(DVec3, DVec3)> {
    // A destroyed target is a lookup miss: homing stops, flight continues.
    let target_position = projectile.target.and_then(|id| {
        let target = live_enemy(world, id)?;
        let position = world.get::<&Transform>(target).ok()?.position;
        Some(position)
    });
    if target_position.is_none() {
        projectile.target = None;
    }

    let mut query = world
        .query_one::<(&mut Transform, &mut Velocity)>(entity)
        .ok()?;
    let (transform, velocity) = query.get()?;
    if let Some(target) = target_position {
        if let Some(dir) = (target - transform.position).try_normalize() {
            let desired = dir * TORPEDO_SPEED;
            velocity.0 = velocity.0.lerp(desired, frame_rate_factor(TORPEDO_HOMING_RATE, dt_ms));
        }
    }
    let start = transform.position;
    transform.position += velocity.0 * f;
    Some((start, transform.position))
}
