//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the player ship, mission state
//! and the scheduled-event queue. It processes player commands, runs all
//! systems and produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::{BTreeSet, VecDeque};

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use starfleet_core::commands::{PlayerCommand, PlayerInput};
use starfleet_core::components::{Defenses, EntityId, HullBreach, PlayerShip};
use starfleet_core::config::{ConfigError, Content};
use starfleet_core::constants::*;
use starfleet_core::enums::{GamePhase, MissionPhase, UpgradeKind};
use starfleet_core::events::SimEvent;
use starfleet_core::state::GameStateSnapshot;
use starfleet_core::types::{SimTime, Transform};

use crate::mission::{summarize, KillCam, MissionState, ScoreState};
use crate::scheduler::{ScheduledEvent, ScheduledQueue};
use crate::systems;
use crate::systems::damage::Casualty;
use crate::systems::snapshot::SnapshotSource;
use crate::systems::weapons::TorpedoLaunch;
use crate::upgrades;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Enemy templates, mission roster and upgrade catalog.
    pub content: Content,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            content: Content::default(),
        }
    }
}

/// A command that could not be carried out. Surfaced to the player as a
/// status message; the simulation state is left untouched.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Content(#[from] ConfigError),
    #[error("upgrade {0:?} is not offered")]
    NotOffered(UpgradeKind),
    #[error("upgrade {0:?} is already installed")]
    AlreadyOwned(UpgradeKind),
    #[error("{upgrade:?} costs {cost} credits, only {credits} available")]
    InsufficientCredits {
        upgrade: UpgradeKind,
        cost: u32,
        credits: u32,
    },
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    content: Content,
    command_queue: VecDeque<PlayerCommand>,
    input: PlayerInput,
    torpedo_requested: bool,
    despawn_buffer: Vec<Entity>,
    casualties: Vec<Casualty>,
    events: Vec<SimEvent>,
    scheduler: ScheduledQueue,

    // --- Player ---
    ship: PlayerShip,
    upgrades: BTreeSet<UpgradeKind>,
    target_lock: Option<Entity>,
    hull_breaches: Vec<HullBreach>,

    // --- Mission ---
    mission: MissionState,
    score: ScoreState,
    kill_cam: Option<KillCam>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            content: config.content,
            command_queue: VecDeque::new(),
            input: PlayerInput::default(),
            torpedo_requested: false,
            despawn_buffer: Vec::new(),
            casualties: Vec::new(),
            events: Vec::new(),
            scheduler: ScheduledQueue::new(),
            ship: PlayerShip::default(),
            upgrades: BTreeSet::new(),
            target_lock: None,
            hull_breaches: Vec::new(),
            mission: MissionState::default(),
            score: ScoreState::default(),
            kill_cam: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Replace the held control state read by the next tick.
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input.sanitized();
    }

    /// Advance the simulation by `dt_ms` and return the resulting snapshot.
    ///
    /// Long frames are clamped to `MAX_FRAME_MS`. Nothing advances unless
    /// the game is active, so pausing also freezes every scheduled event.
    pub fn tick(&mut self, dt_ms: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = if dt_ms.is_finite() {
                dt_ms.clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.time.advance(dt);
            self.run_systems(dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &SnapshotSource {
                time: self.time,
                phase: self.phase,
                mission: &self.mission,
                ship: &self.ship,
                target_lock: self.target_lock,
                kill_cam: self.kill_cam,
                hull_breaches: &self.hull_breaches,
                score: &self.score,
            },
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ship(&self) -> &PlayerShip {
        &self.ship
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Currently locked enemy, if any.
    pub fn target_lock(&self) -> Option<EntityId> {
        self.target_lock.map(world_setup::entity_id)
    }

    /// Start (or restart) a mission by roster key.
    ///
    /// Resets the ship, clears every enemy, ally and projectile, and cancels
    /// anything still scheduled from the previous mission.
    pub fn start_mission(&mut self, key: &str) -> Result<(), CommandError> {
        let spec = self.content.mission(key)?.clone();

        self.world.clear();
        self.scheduler.advance_epoch();
        world_setup::refit_ship(&mut self.ship);
        self.hull_breaches.clear();
        self.casualties.clear();
        self.target_lock = None;
        self.kill_cam = None;
        self.torpedo_requested = false;
        self.score = ScoreState::default();
        self.time = SimTime::default();
        self.mission = MissionState::begin(key, spec);
        self.phase = GamePhase::Active;

        let wanted = self.mission.spec.as_ref().map_or(0, |s| s.allies);
        if wanted > 0 {
            let deployed = world_setup::deploy_allies(
                &mut self.world,
                &self.content.allies,
                wanted,
                &self.ship.transform,
                self.time.elapsed_ms,
            );
            self.mission.allies_deployed = deployed;
            if deployed > 0 {
                self.events.push(SimEvent::FleetReady { count: deployed });
            }
        }

        info!(
            mission = key,
            waves = ?self.mission.max_waves(),
            difficulty = self.mission.difficulty(),
            "mission started"
        );
        self.spawn_current_wave();
        Ok(())
    }

    /// Buy an upgrade from the catalog.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<(), CommandError> {
        let spec = *self
            .content
            .upgrade(kind)
            .ok_or(CommandError::NotOffered(kind))?;
        upgrades::purchase(&mut self.ship, &mut self.upgrades, &spec)?;
        info!(upgrade = ?kind, cost = spec.cost, "upgrade purchased");
        self.events.push(SimEvent::UpgradePurchased { upgrade: kind });
        Ok(())
    }

    /// Installed upgrades.
    pub fn upgrades(&self) -> &BTreeSet<UpgradeKind> {
        &self.upgrades
    }

    /// Get a mutable reference to the ECS world (for tests).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get a mutable reference to the player ship (for tests).
    #[cfg(test)]
    pub fn ship_mut(&mut self) -> &mut PlayerShip {
        &mut self.ship
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &ScheduledQueue {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn kill_cam(&self) -> Option<KillCam> {
        self.kill_cam
    }

    #[cfg(test)]
    pub fn hull_breaches(&self) -> &[HullBreach] {
        &self.hull_breaches
    }

    /// Spawn an enemy outside the wave schedule (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        class: starfleet_core::enums::EnemyClass,
        position: glam::DVec3,
        formation: starfleet_core::components::Formation,
    ) -> Entity {
        world_setup::spawn_enemy(
            &mut self.world,
            &self.content.enemies,
            class,
            position,
            self.ship.transform.position,
            formation,
            self.time.elapsed_ms,
        )
        .expect("class has a template")
    }

    /// Hit an enemy or ally and apply any destruction effects (for tests).
    #[cfg(test)]
    pub fn strike(
        &mut self,
        entity: Entity,
        raw: f64,
    ) -> Option<systems::damage::AppliedDamage> {
        let applied = systems::damage::damage_vessel(
            &mut self.world,
            entity,
            raw,
            self.time.elapsed_ms,
            &mut self.scheduler,
            &mut self.events,
            &mut self.casualties,
        );
        self.resolve_casualties();
        applied
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let active = self.phase == GamePhase::Active;
        match command {
            PlayerCommand::StartMission { mission } => {
                if let Err(err) = self.start_mission(&mission) {
                    self.refuse(err);
                }
            }
            PlayerCommand::ReturnToMenu => {
                self.world.clear();
                self.scheduler.advance_epoch();
                self.hull_breaches.clear();
                self.target_lock = None;
                self.kill_cam = None;
                self.torpedo_requested = false;
                self.mission = MissionState::default();
                self.phase = GamePhase::MainMenu;
                info!("returned to menu");
            }
            PlayerCommand::Pause => {
                if active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::FireTorpedo => {
                if active {
                    self.torpedo_requested = true;
                }
            }
            PlayerCommand::ToggleShields => {
                if active {
                    self.ship.shields_active = !self.ship.shields_active;
                    let message = if self.ship.shields_active {
                        "Shields raised"
                    } else {
                        "Shields lowered"
                    };
                    self.status(message);
                }
            }
            PlayerCommand::ToggleAutopilot => {
                if active {
                    self.ship.autopilot = !self.ship.autopilot;
                    let message = if self.ship.autopilot {
                        "Autopilot engaged"
                    } else {
                        "Autopilot disengaged"
                    };
                    self.status(message);
                }
            }
            PlayerCommand::PurchaseUpgrade { upgrade } => {
                if let Err(err) = self.purchase_upgrade(upgrade) {
                    self.refuse(err);
                }
            }
        }
    }

    fn status(&mut self, message: &str) {
        self.events.push(SimEvent::StatusMessage {
            message: message.to_string(),
        });
    }

    fn refuse(&mut self, err: CommandError) {
        warn!(error = %err, "command refused");
        self.events.push(SimEvent::StatusMessage {
            message: err.to_string(),
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_ms;
        trace!(tick = self.time.tick, now, "tick");

        // 1. Mission director timers
        self.run_scheduled();
        if self.phase != GamePhase::Active {
            return;
        }

        // 2. Player flight, regeneration and repair
        let lock_position = self
            .target_lock
            .and_then(|e| self.world.get::<&Transform>(e).ok().map(|t| t.position));
        systems::flight::run(&mut self.ship, &self.input, lock_position, dt, &mut self.events);

        // 3. Target lock
        systems::target_lock::run(&self.world, &self.ship, &mut self.target_lock, &mut self.events);

        // 4. Enemy AI
        systems::enemy_ai::run(
            &mut self.world,
            self.ship.transform.position,
            now,
            dt,
            &mut self.events,
        );

        // 5. Ally AI
        systems::ally_ai::run(
            &mut self.world,
            &self.ship.transform,
            now,
            dt,
            &mut self.scheduler,
            &mut self.events,
            &mut self.casualties,
        );
        self.resolve_casualties();

        // 6. Player weapons
        if self.input.fire_phaser
            && systems::weapons::fire_phaser(
                &mut self.world,
                &mut self.ship,
                self.input.aim_point,
                self.target_lock,
                now,
                &mut self.scheduler,
                &mut self.events,
                &mut self.casualties,
            )
        {
            self.score.phasers_fired += 1;
        }
        self.resolve_casualties();
        if std::mem::take(&mut self.torpedo_requested) {
            let launch = systems::weapons::fire_torpedo(
                &mut self.world,
                &mut self.ship,
                self.input.aim_point,
                self.target_lock,
                now,
                &mut self.scheduler,
                &mut self.events,
            );
            if let TorpedoLaunch::Fired(_) = launch {
                self.score.torpedoes_fired += 1;
            }
        }

        // 7. Projectiles (integrate, home, collide, expire)
        systems::projectiles::run(
            &mut self.world,
            &mut self.ship,
            dt,
            now,
            &mut self.rng,
            &mut self.hull_breaches,
            &mut self.scheduler,
            &mut self.events,
            &mut self.casualties,
            &mut self.despawn_buffer,
        );
        self.resolve_casualties();

        // 8. Hull breaches
        systems::effects::run_breaches(&mut self.hull_breaches, &self.ship, dt);

        // 9. Player destruction
        self.check_player_destroyed();
    }

    /// Drain scheduled events that are due.
    fn run_scheduled(&mut self) {
        let now = self.time.elapsed_ms;
        while let Some(event) = self.scheduler.pop_due(now) {
            match event {
                ScheduledEvent::SpawnWave => {
                    if self.mission.phase == MissionPhase::WaveClearPause {
                        self.spawn_current_wave();
                    }
                }
                ScheduledEvent::MissionFailed => {
                    if !self.mission.phase.is_over() {
                        self.end_mission(false);
                    }
                }
                ScheduledEvent::TorpedoReloaded => {
                    systems::weapons::complete_reload(&mut self.ship, &mut self.events);
                }
                ScheduledEvent::KillCamEnd => {
                    self.kill_cam = None;
                }
                ScheduledEvent::ShieldFlashEnd { entity } => {
                    if let Some(entity) = world_setup::resolve(entity) {
                        if let Ok(mut defenses) = self.world.get::<&mut Defenses>(entity) {
                            defenses.shield_flash = false;
                        }
                    }
                }
            }
        }
    }

    fn spawn_current_wave(&mut self) {
        let wave = self.mission.wave;
        let count = world_setup::spawn_wave(
            &mut self.world,
            &mut self.rng,
            &self.content.enemies,
            wave,
            self.mission.difficulty(),
            self.ship.transform.position,
            self.time.elapsed_ms,
        );
        self.mission.phase = MissionPhase::WaveActive;
        info!(wave, enemies = count, "wave spawned");
        self.events.push(SimEvent::WaveAnnounced {
            wave,
            enemy_count: count,
        });
        if count == 0 {
            self.wave_cleared();
        }
    }

    /// Apply destruction effects for everything removed from the world since
    /// the last call.
    fn resolve_casualties(&mut self) {
        if self.casualties.is_empty() {
            return;
        }
        let now = self.time.elapsed_ms;
        for casualty in std::mem::take(&mut self.casualties) {
            match casualty {
                Casualty::Enemy {
                    id,
                    class,
                    credits,
                    position,
                } => {
                    debug!(enemy = id.0, ?class, credits, "enemy destroyed");
                    self.events.push(SimEvent::Explosion { position });
                    self.events.push(SimEvent::EnemyDestroyed {
                        enemy: id,
                        class,
                        credits,
                    });
                    self.ship.credits += credits;
                    self.score.enemies_destroyed += 1;

                    if self.target_lock.map(world_setup::entity_id) == Some(id) {
                        self.target_lock = None;
                    }
                    if self.kill_cam.is_none() && self.rng.gen::<f64>() < KILL_CAM_CHANCE {
                        self.kill_cam = Some(KillCam {
                            focus: position,
                            ends_at_ms: now + KILL_CAM_DURATION_MS,
                        });
                        self.scheduler
                            .schedule(now, KILL_CAM_DURATION_MS, ScheduledEvent::KillCamEnd);
                    }

                    if self.mission.phase == MissionPhase::WaveActive
                        && world_setup::enemy_count(&self.world) == 0
                    {
                        self.wave_cleared();
                    }
                }
                Casualty::Ally { name, position } => {
                    debug!(ally = %name, "ally destroyed");
                    self.events.push(SimEvent::Explosion { position });
                    self.events.push(SimEvent::AllyLost { name });
                    self.score.allies_lost += 1;
                }
            }
        }
    }

    /// The last enemy of the wave is gone: advance the wave, then either end
    /// the mission or start the wave-clear pause.
    fn wave_cleared(&mut self) {
        if self.mission.failure_pending {
            return;
        }
        let cleared = self.mission.wave;
        self.mission.wave += 1;
        self.score.waves_completed += 1;
        info!(wave = cleared, "wave cleared");
        self.events.push(SimEvent::WaveCleared { wave: cleared });

        if self.mission.is_final_wave_cleared() {
            self.end_mission(true);
        } else {
            self.mission.phase = MissionPhase::WaveClearPause;
            self.scheduler.schedule(
                self.time.elapsed_ms,
                WAVE_CLEAR_PAUSE_MS,
                ScheduledEvent::SpawnWave,
            );
        }
    }

    fn check_player_destroyed(&mut self) {
        if self.ship.hull > 0.0 || self.mission.failure_pending || self.mission.phase.is_over() {
            return;
        }
        info!("hull integrity lost");
        self.mission.failure_pending = true;
        self.scheduler.schedule(
            self.time.elapsed_ms,
            GAME_OVER_DELAY_MS,
            ScheduledEvent::MissionFailed,
        );
    }

    fn end_mission(&mut self, victory: bool) {
        self.mission.phase = if victory {
            MissionPhase::MissionComplete
        } else {
            MissionPhase::MissionFailed
        };
        self.phase = GamePhase::GameOver;
        let allies_alive = world_setup::ally_count(&self.world) as u32;
        let summary = summarize(&self.mission, &self.score, self.ship.credits, allies_alive);
        info!(
            victory,
            waves = summary.waves_completed,
            kills = summary.enemies_destroyed,
            "mission ended"
        );
        self.events.push(SimEvent::MissionEnded { victory, summary });
    }
}
