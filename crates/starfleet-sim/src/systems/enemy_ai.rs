//! Enemy AI system: formation flying, facing, crew announcements and fire.
//!
//! Decisions come from `starfleet_ai::steering`; this system gathers the
//! inputs from the world, then applies the results in a second pass.

use std::collections::HashMap;

use glam::DVec3;
use hecs::{Entity, World};

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::{EnemyClass, ProjectileKind, WeaponKind};
use starfleet_core::events::SimEvent;
use starfleet_core::types::{frame_rate_factor, frames, Transform};

use starfleet_ai::steering::{
    enemy_facing, enemy_should_fire, steer_enemy, EnemyContext, EnemyRole,
};

use crate::world_setup::{entity_id, spawn_projectile};

struct EnemyUpdate {
    entity: Entity,
    displacement: DVec3,
    fire: bool,
    announce: Option<(EnemyClass, f64)>,
}

/// Run the enemy AI for one tick.
pub fn run(
    world: &mut World,
    player_position: DVec3,
    now_ms: f64,
    dt_ms: f64,
    events: &mut Vec<SimEvent>,
) {
    let f = frames(dt_ms);

    // Leader positions at the start of the tick, keyed by group.
    let leaders: HashMap<u32, DVec3> = world
        .query::<(&Transform, &Formation, &EnemyProfile)>()
        .iter()
        .filter(|(_, (_, formation, _))| formation.is_leader)
        .map(|(_, (t, formation, _))| (formation.group_id, t.position))
        .collect();

    let mut updates = Vec::new();
    {
        let mut query = world.query::<(&Transform, &Combatant, &Formation, &EnemyProfile)>();
        for (entity, (transform, combatant, formation, profile)) in query.iter() {
            let role = if formation.is_leader {
                EnemyRole::Leader
            } else {
                EnemyRole::Wingman {
                    leader_position: leaders.get(&formation.group_id).copied(),
                    offset: formation.offset,
                }
            };
            let steering = steer_enemy(&EnemyContext {
                role,
                position: transform.position,
                speed: combatant.speed,
                player_position,
                frames: f,
            });

            let distance = transform.distance_to(player_position);
            let announce = (!profile.announced && distance < ENEMY_ANNOUNCE_RANGE)
                .then_some((profile.class, distance));
            updates.push(EnemyUpdate {
                entity,
                displacement: steering.displacement,
                fire: enemy_should_fire(now_ms, combatant.last_fire_ms, combatant.fire_rate_ms, distance),
                announce,
            });
        }
    }

    for update in updates {
        let mut shot = None;
        if let Ok(mut query) =
            world.query_one::<(&mut Transform, &mut Combatant, &mut Defenses, &mut EnemyProfile)>(
                update.entity,
            )
        {
            let Some((transform, combatant, defenses, profile)) = query.get() else {
                continue;
            };
            transform.position += update.displacement;
            if let Some(facing) = enemy_facing(transform.position, player_position, combatant.turn_speed) {
                transform.orientation = transform
                    .orientation
                    .slerp(facing.target, frame_rate_factor(facing.rate, dt_ms))
                    .normalize();
            }

            if profile.shield_regen_per_ms > 0.0 && defenses.shields < defenses.max_shields {
                defenses.shields =
                    (defenses.shields + profile.shield_regen_per_ms * dt_ms).min(defenses.max_shields);
            }

            if let Some((class, distance)) = update.announce {
                profile.announced = true;
                events.push(SimEvent::EnemyAnnounced {
                    enemy: entity_id(update.entity),
                    class,
                    distance,
                });
            }

            if update.fire {
                combatant.last_fire_ms = now_ms;
                let direction = (player_position - transform.position).normalize_or_zero();
                shot = Some((transform.position, direction * ENEMY_SHOT_SPEED, combatant.damage));
            }
        }

        if let Some((position, velocity, damage)) = shot {
            spawn_projectile(
                world,
                ProjectileKind::EnemyShot,
                position,
                velocity,
                damage,
                ENEMY_SHOT_LIFE_MS,
                None,
            );
            events.push(SimEvent::WeaponFired {
                weapon: WeaponKind::EnemyDisruptor,
            });
        }
    }
}
