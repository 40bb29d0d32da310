//! Ally AI system: escort formation, engagement and beam fire.

use glam::DVec3;
use hecs::{Entity, World};

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::{ProjectileKind, WeaponKind};
use starfleet_core::events::SimEvent;
use starfleet_core::types::{frame_rate_factor, frames, point_to_segment_distance, Transform};

use starfleet_ai::steering::{steer_ally, AllyContext};

use crate::scheduler::ScheduledQueue;
use crate::systems::damage::{damage_vessel, Casualty};
use crate::world_setup::{entity_id, spawn_beam};

struct Volley {
    start: DVec3,
    end: DVec3,
    damage: f64,
}

/// Run the ally AI for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    player: &Transform,
    now_ms: f64,
    dt_ms: f64,
    scheduler: &mut ScheduledQueue,
    events: &mut Vec<SimEvent>,
    casualties: &mut Vec<Casualty>,
) {
    let f = frames(dt_ms);
    let enemies: Vec<(Entity, DVec3)> = world
        .query::<(&Transform, &EnemyProfile)>()
        .iter()
        .map(|(e, (t, _))| (e, t.position))
        .collect();

    let mut volleys = Vec::new();
    for (_entity, (transform, combatant, defenses, profile)) in world.query_mut::<(
        &mut Transform,
        &mut Combatant,
        &mut Defenses,
        &mut AllyProfile,
    )>() {
        let nearest = enemies
            .iter()
            .map(|&(e, p)| (e, p, transform.distance_to(p)))
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let steering = steer_ally(&AllyContext {
            position: transform.position,
            speed: combatant.speed,
            turn_speed: combatant.turn_speed,
            nearest_enemy: nearest.map(|(_, p, d)| (p, d)),
            player_position: player.position,
            player_orientation: player.orientation,
            formation_offset: profile.formation_offset,
            frames: f,
        });

        transform.position += steering.displacement;
        if let Some(facing) = steering.facing {
            transform.orientation = transform
                .orientation
                .slerp(facing.target, frame_rate_factor(facing.rate, dt_ms))
                .normalize();
        }
        profile.engaging = nearest
            .filter(|_| steering.is_engaging())
            .map(|(e, _, _)| entity_id(e));

        if defenses.shields < defenses.max_shields {
            defenses.shields =
                (defenses.shields + ALLY_SHIELD_REGEN_PER_MS * dt_ms).min(defenses.max_shields);
        }

        if steering.in_fire_range && now_ms - combatant.last_fire_ms > combatant.fire_rate_ms {
            if let Some((_, enemy, _)) = nearest {
                combatant.last_fire_ms = now_ms;
                let direction = (enemy - transform.position).normalize_or_zero();
                volleys.push(Volley {
                    start: transform.position,
                    end: transform.position + direction * ALLY_BEAM_LENGTH,
                    damage: combatant.damage,
                });
            }
        }
    }

    for volley in volleys {
        let struck: Vec<Entity> = world
            .query::<(&Transform, &EnemyProfile)>()
            .iter()
            .filter(|(_, (t, _))| {
                point_to_segment_distance(t.position, volley.start, volley.end) < BEAM_HIT_TOLERANCE
            })
            .map(|(e, _)| e)
            .collect();
        for enemy in struck {
            damage_vessel(world, enemy, volley.damage, now_ms, scheduler, events, casualties);
        }
        spawn_beam(world, ProjectileKind::AllyBeam, volley.start, volley.end);
        events.push(SimEvent::WeaponFired {
            weapon: WeaponKind::AllyPhaser,
        });
    }
}
