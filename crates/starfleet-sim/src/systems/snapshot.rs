//! Snapshot system: reads the world and engine state into a `GameStateSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use starfleet_core::components::*;
use starfleet_core::enums::GamePhase;
use starfleet_core::events::SimEvent;
use starfleet_core::state::*;
use starfleet_core::types::{SimTime, Transform};

use crate::mission::{KillCam, MissionState, ScoreState};
use crate::systems::subsystems::efficiency;
use crate::world_setup::entity_id;

/// Engine-owned state the snapshot reads besides the world.
pub struct SnapshotSource<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mission: &'a MissionState,
    pub ship: &'a PlayerShip,
    pub target_lock: Option<Entity>,
    pub kill_cam: Option<KillCam>,
    pub hull_breaches: &'a [HullBreach],
    pub score: &'a ScoreState,
}

/// Build a complete snapshot.
pub fn build_snapshot(
    world: &World,
    source: &SnapshotSource<'_>,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let now_ms = source.time.elapsed_ms;
    GameStateSnapshot {
        time: source.time,
        phase: source.phase,
        mission_phase: source.mission.phase,
        mission: source.mission.key.clone(),
        wave: source.mission.wave,
        max_waves: source.mission.max_waves(),
        ship: build_ship(source.ship, now_ms),
        subsystems: source
            .ship
            .subsystems
            .0
            .iter()
            .map(|s| SubsystemView::new(s, efficiency(s)))
            .collect(),
        enemies: build_enemies(world),
        allies: build_allies(world),
        projectiles: build_projectiles(world),
        target_lock: source
            .target_lock
            .and_then(|e| build_target(world, source.ship, e)),
        kill_cam: source.kill_cam.map(|cam| KillCamView {
            focus: cam.focus,
            remaining_ms: (cam.ends_at_ms - now_ms).max(0.0),
        }),
        hull_breaches: source.hull_breaches.to_vec(),
        score: ScoreView {
            enemies_destroyed: source.score.enemies_destroyed,
            waves_completed: source.score.waves_completed,
            torpedoes_fired: source.score.torpedoes_fired,
            phasers_fired: source.score.phasers_fired,
            allies_lost: source.score.allies_lost,
        },
        events,
    }
}

fn build_ship(ship: &PlayerShip, now_ms: f64) -> ShipView {
    ShipView {
        position: ship.transform.position,
        orientation: ship.transform.orientation,
        hull: ship.hull,
        max_hull: ship.max_hull,
        shields: ship.shields,
        max_shields: ship.max_shields,
        shields_active: ship.shields_active,
        shield_flash: ship.shield_flash_ms > 0.0,
        energy: ship.energy,
        max_energy: ship.max_energy,
        speed: ship.speed,
        max_speed: ship.max_speed,
        warp: ship.warp,
        max_warp: ship.max_warp,
        autopilot: ship.autopilot,
        phaser_charge: ship.weapons.phaser_charge,
        phaser_damage: ship.weapons.phaser_damage,
        torpedoes: ship.weapons.torpedoes,
        max_torpedoes: ship.weapons.max_torpedoes,
        torpedo_damage: ship.weapons.torpedo_damage,
        reload_remaining_secs: reload_remaining_secs(ship.weapons.reload, now_ms),
        credits: ship.credits,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    world
        .query::<(&Transform, &Defenses, &EnemyProfile, &Formation)>()
        .iter()
        .map(|(e, (t, d, profile, formation))| EnemyView {
            id: entity_id(e),
            class: profile.class,
            position: t.position,
            orientation: t.orientation,
            health: d.health,
            max_health: d.max_health,
            shields: d.shields,
            max_shields: d.max_shields,
            shield_flash: d.shield_flash,
            group_id: formation.group_id,
            is_leader: formation.is_leader,
        })
        .collect()
}

fn build_allies(world: &World) -> Vec<AllyView> {
    world
        .query::<(&Transform, &Defenses, &AllyProfile)>()
        .iter()
        .map(|(e, (t, d, profile))| AllyView {
            id: entity_id(e),
            name: profile.name.clone(),
            position: t.position,
            orientation: t.orientation,
            health: d.health,
            max_health: d.max_health,
            shields: d.shields,
            max_shields: d.max_shields,
            shield_flash: d.shield_flash,
            engaging: profile.engaging,
        })
        .collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Transform, &Velocity, &Projectile)>()
        .iter()
        .map(|(e, (t, v, p))| ProjectileView {
            id: entity_id(e),
            kind: p.kind,
            position: t.position,
            velocity: v.0,
            beam_end: p.beam_end,
            life_ms: p.life_ms,
        })
        .collect()
}

fn build_target(world: &World, ship: &PlayerShip, entity: Entity) -> Option<TargetView> {
    let mut query = world
        .query_one::<(&Transform, &Defenses, &EnemyProfile)>(entity)
        .ok()?;
    let (t, d, profile) = query.get()?;
    let hull_percent = if d.max_health > 0.0 {
        (d.health / d.max_health * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };
    Some(TargetView {
        id: entity_id(entity),
        class: profile.class,
        distance: ship.transform.distance_to(t.position),
        hull_percent,
    })
}
