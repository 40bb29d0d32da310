//! Entity spawn factories for the simulation world.
//!
//! Enemies, allies and projectiles are hecs entities with plain-data component
//! bundles. Handles crossing the crate boundary are `EntityId`s, the packed
//! bits of a generation-checked `hecs::Entity`.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfleet_core::components::*;
use starfleet_core::constants::*;
use starfleet_core::enums::*;
use starfleet_core::registry::{AllyTemplate, EnemyRegistry};
use starfleet_core::types::{look_rotation, Transform};

use starfleet_ai::formation::plan_wave;

/// Opaque id for an entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Entity for an id. `None` for ids that were never valid; a stale id still
/// resolves but misses on every world lookup.
pub fn resolve(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// Whether `id` refers to a live enemy.
pub fn live_enemy(world: &World, id: EntityId) -> Option<Entity> {
    resolve(id).filter(|&e| world.get::<&EnemyProfile>(e).is_ok())
}

/// Spawn one enemy facing the player.
pub fn spawn_enemy(
    world: &mut World,
    registry: &EnemyRegistry,
    class: EnemyClass,
    position: DVec3,
    player: DVec3,
    formation: Formation,
    now_ms: f64,
) -> Option<Entity> {
    let template = registry.template(class)?;
    let transform = Transform {
        position,
        orientation: look_rotation(position, player).unwrap_or_default(),
    };
    Some(world.spawn((
        transform,
        Defenses::new(template.health, template.shields),
        Combatant {
            speed: template.speed,
            turn_speed: template.turn_speed,
            damage: template.damage,
            fire_rate_ms: template.fire_rate_ms,
            last_fire_ms: now_ms,
        },
        EnemyProfile {
            class,
            credits: template.credits,
            announced: false,
            shield_regen_per_ms: template.shield_regen_per_ms,
        },
        formation,
    )))
}

/// Lay out and spawn a full wave around the player. Returns the number spawned.
pub fn spawn_wave(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    registry: &EnemyRegistry,
    wave: u32,
    difficulty: f64,
    player: DVec3,
    now_ms: f64,
) -> u32 {
    let plan = plan_wave(wave, difficulty, player, rng);
    debug_assert!(
        {
            let mut groups: Vec<u32> = plan
                .iter()
                .filter(|s| s.is_leader)
                .map(|s| s.group_id)
                .collect();
            let leaders = groups.len();
            groups.dedup();
            groups.len() == leaders
        },
        "formation group with more than one leader"
    );

    let mut spawned = 0;
    for slot in plan {
        let class = registry.roll_class(wave, rng);
        let jitter = (rng.gen::<f64>() - 0.5) * SPAWN_ALTITUDE_JITTER;
        let formation = Formation {
            group_id: slot.group_id,
            offset: slot.offset,
            is_leader: slot.is_leader,
        };
        let position = slot.position + DVec3::new(0.0, jitter, 0.0);
        if spawn_enemy(world, registry, class, position, player, formation, now_ms).is_some() {
            spawned += 1;
        }
    }
    spawned
}

/// Deploy up to `count` escorts on their stations around the player.
pub fn deploy_allies(
    world: &mut World,
    template: &AllyTemplate,
    count: u32,
    player: &Transform,
    now_ms: f64,
) -> u32 {
    let count = (count as usize)
        .min(MAX_ALLIES)
        .min(template.names.len())
        .min(template.formation_offsets.len());
    for i in 0..count {
        let offset = template.formation_offsets[i];
        world.spawn((
            Transform {
                position: player.position + player.orientation * offset,
                orientation: player.orientation,
            },
            Defenses::new(template.health, template.shields),
            Combatant {
                speed: template.speed,
                turn_speed: template.turn_speed,
                damage: template.damage,
                fire_rate_ms: template.fire_rate_ms,
                last_fire_ms: now_ms,
            },
            AllyProfile {
                name: template.names[i].clone(),
                formation_offset: offset,
                engaging: None,
            },
        ));
    }
    count as u32
}

/// Spawn a moving projectile (torpedo or enemy shot).
pub fn spawn_projectile(
    world: &mut World,
    kind: ProjectileKind,
    position: DVec3,
    velocity: DVec3,
    damage: f64,
    life_ms: f64,
    target: Option<EntityId>,
) -> Entity {
    world.spawn((
        Transform::at(position),
        Velocity(velocity),
        Projectile {
            kind,
            damage,
            life_ms,
            target,
            beam_end: None,
        },
    ))
}

/// Leave a beam record for the renderer. Beams deal their damage when fired.
pub fn spawn_beam(world: &mut World, kind: ProjectileKind, start: DVec3, end: DVec3) -> Entity {
    world.spawn((
        Transform::at(start),
        Velocity::default(),
        Projectile {
            kind,
            damage: 0.0,
            life_ms: BEAM_LIFE_MS,
            target: None,
            beam_end: Some(end),
        },
    ))
}

/// Count live enemies.
pub fn enemy_count(world: &World) -> usize {
    world.query::<&EnemyProfile>().iter().count()
}

/// Count live allies.
pub fn ally_count(world: &World) -> usize {
    world.query::<&AllyProfile>().iter().count()
}

/// Restore the ship for a new mission: current values back to their maxima,
/// position and weapons reset. Upgraded maxima and credits carry over.
pub fn refit_ship(ship: &mut PlayerShip) {
    *ship = PlayerShip {
        hull: ship.max_hull,
        max_hull: ship.max_hull,
        shields: ship.max_shields,
        max_shields: ship.max_shields,
        energy: ship.max_energy,
        max_energy: ship.max_energy,
        max_speed: ship.max_speed,
        max_warp: ship.max_warp,
        credits: ship.credits,
        weapons: WeaponBay {
            phaser_damage: ship.weapons.phaser_damage,
            torpedoes: ship.weapons.max_torpedoes,
            max_torpedoes: ship.weapons.max_torpedoes,
            torpedo_damage: ship.weapons.torpedo_damage,
            ..WeaponBay::default()
        },
        ..PlayerShip::default()
    };
}
