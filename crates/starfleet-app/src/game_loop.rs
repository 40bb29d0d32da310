//! Game loop thread: runs the simulation engine at a fixed rate and publishes
//! snapshots.
//!
//! The engine is created inside the thread so it never crosses threads.
//! Commands and input arrive via an `mpsc` channel; the latest snapshot is
//! stored in shared state for polling.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use starfleet_core::state::GameStateSnapshot;
use starfleet_sim::{SimConfig, SimulationEngine};

use crate::state::{shared_snapshot, GameLoopCommand, SharedSnapshot};

/// Running game loop thread.
pub struct GameLoopHandle {
    commands: mpsc::Sender<GameLoopCommand>,
    latest_snapshot: SharedSnapshot,
    thread: Option<JoinHandle<()>>,
}

impl GameLoopHandle {
    /// Forward a command. Returns false once the loop has stopped.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Copy of the most recent snapshot.
    pub fn latest_snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    pub fn shared_snapshot(&self) -> SharedSnapshot {
        self.latest_snapshot.clone()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(mut self) {
        let _ = self.commands.send(GameLoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("game loop thread panicked");
            }
        }
    }
}

/// Nominal duration of one tick at `tick_rate` Hz.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64)
}

/// Spawn the game loop in a new thread, ticking `tick_rate` times a second.
pub fn spawn_game_loop(config: SimConfig, tick_rate: u32) -> std::io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = shared_snapshot();
    let shared = latest_snapshot.clone();

    let thread = std::thread::Builder::new()
        .name("starfleet-game-loop".into())
        .spawn(move || run_game_loop(config, tick_rate, cmd_rx, &shared))?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    tick_rate: u32,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
) {
    let seed = config.seed;
    let mut engine = SimulationEngine::new(config);
    let period = tick_duration(tick_rate);
    let dt_ms = period.as_secs_f64() * 1000.0;
    let mut next_tick_time = Instant::now();
    info!(seed, tick_rate, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(command)) => engine.queue_command(command),
                Ok(GameLoopCommand::Input(input)) => engine.set_input(input),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(ticks = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (the engine handles pause internally)
        let snapshot = engine.tick(dt_ms);

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += period;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > period * 2 {
            // Too far behind: reset instead of spiralling to catch up.
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfleet_core::commands::{PlayerCommand, PlayerInput};
    use starfleet_core::enums::{GamePhase, Throttle};

    fn wait_for<F: Fn(&GameStateSnapshot) -> bool>(
        handle: &GameLoopHandle,
        pred: F,
    ) -> Option<GameStateSnapshot> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(snapshot) = handle.latest_snapshot().filter(|s| pred(s)) {
                return Some(snapshot);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(50), Duration::from_millis(20));
        // A zero rate is treated as 1 Hz.
        assert_eq!(tick_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_loop_starts_mission_and_applies_input() {
        let handle = spawn_game_loop(SimConfig::default(), 500).unwrap();
        assert!(handle.send(GameLoopCommand::Player(PlayerCommand::StartMission {
            mission: "patrol".into(),
        })));
        let snapshot = wait_for(&handle, |s| s.phase == GamePhase::Active)
            .expect("mission should start");
        assert_eq!(snapshot.wave, 1);

        handle.send(GameLoopCommand::Input(PlayerInput {
            throttle: Throttle::Accelerate,
            ..Default::default()
        }));
        assert!(wait_for(&handle, |s| s.ship.speed > 0.0).is_some());

        handle.send(GameLoopCommand::Player(PlayerCommand::Pause));
        let paused = wait_for(&handle, |s| s.phase == GamePhase::Paused).expect("paused");
        std::thread::sleep(Duration::from_millis(20));
        let later = handle.latest_snapshot().unwrap();
        assert_eq!(later.time.tick, paused.time.tick);

        handle.shutdown();
    }

    #[test]
    fn test_shutdown_stops_thread() {
        let handle = spawn_game_loop(SimConfig::default(), 200).unwrap();
        let shared = handle.shared_snapshot();
        handle.shutdown();
        let tick = shared.lock().unwrap().as_ref().map(|s| s.time.tick);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(shared.lock().unwrap().as_ref().map(|s| s.time.tick), tick);
    }
}
