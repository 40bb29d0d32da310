//! Scripted mission runs: fast-forward for batch use, or real time through
//! the game loop thread.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use starfleet_core::commands::PlayerCommand;
use starfleet_core::constants::FRAME_MS;
use starfleet_core::enums::GamePhase;
use starfleet_core::events::{MissionSummary, SimEvent};
use starfleet_core::state::{GameStateSnapshot, ScoreView};
use starfleet_sim::{SimConfig, SimulationEngine};

use crate::game_loop::{spawn_game_loop, tick_duration};
use crate::pilot::ScriptedPilot;
use crate::state::GameLoopCommand;

/// How a run finished.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub ticks: u64,
    /// Set when the mission ended within the tick budget.
    pub ended: Option<(bool, MissionSummary)>,
    pub snapshot: GameStateSnapshot,
}

/// Machine-readable run summary printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mission: String,
    pub seed: u64,
    pub ticks: u64,
    pub victory: Option<bool>,
    pub wave: u32,
    pub hull: f64,
    pub credits: u32,
    pub score: ScoreView,
}

impl RunOutcome {
    pub fn report(&self, mission: &str, seed: u64) -> RunReport {
        RunReport {
            mission: mission.to_string(),
            seed,
            ticks: self.ticks,
            victory: self.ended.as_ref().map(|(victory, _)| *victory),
            wave: self.snapshot.wave,
            hull: self.snapshot.ship.hull,
            credits: self.snapshot.ship.credits,
            score: self.snapshot.score.clone(),
        }
    }
}

fn mission_ended(events: &[SimEvent]) -> Option<(bool, MissionSummary)> {
    events.iter().find_map(|e| match e {
        SimEvent::MissionEnded { victory, summary } => Some((*victory, summary.clone())),
        _ => None,
    })
}

/// Crew-level logging of simulation events.
fn log_events(events: &[SimEvent]) {
    for event in events {
        match event {
            SimEvent::ShieldThresholdCrossed { percent } => info!(percent, "shields report"),
            SimEvent::HullIntegrity { percent } => warn!(percent, "hull integrity report"),
            SimEvent::SystemOffline { system } => warn!(?system, "subsystem offline"),
            SimEvent::AllyLost { name } => warn!(ally = %name, "ally lost"),
            SimEvent::TorpedoReloadStarted => debug!("torpedo bay reloading"),
            SimEvent::StatusMessage { message } => debug!(%message, "status"),
            other => trace!(event = ?other, "sim event"),
        }
    }
}

/// Fly `mission` with the scripted pilot, as fast as possible, for at most
/// `max_ticks` reference frames.
pub fn run_headless(config: SimConfig, mission: &str, max_ticks: u64) -> RunOutcome {
    let mut engine = SimulationEngine::new(config);
    let mut pilot = ScriptedPilot::new();
    engine.queue_command(PlayerCommand::StartMission {
        mission: mission.to_string(),
    });

    let mut snapshot = engine.tick(FRAME_MS);
    let mut ticks = 1;
    let mut ended = None;
    loop {
        log_events(&snapshot.events);
        if let Some(end) = mission_ended(&snapshot.events) {
            ended = Some(end);
        }
        if ended.is_some() || ticks >= max_ticks || snapshot.phase != GamePhase::Active {
            break;
        }
        let (input, commands) = pilot.decide(&snapshot);
        engine.set_input(input);
        engine.queue_commands(commands);
        snapshot = engine.tick(FRAME_MS);
        ticks += 1;
    }

    info!(ticks, wave = snapshot.wave, "headless run finished");
    RunOutcome {
        ticks,
        ended,
        snapshot,
    }
}

/// Fly `mission` in real time through the game loop thread. Snapshots are
/// polled, so events between polls may be missed; the outcome is read from
/// the final snapshot.
pub fn run_realtime(
    config: SimConfig,
    mission: &str,
    max_ticks: u64,
    tick_rate: u32,
) -> std::io::Result<RunOutcome> {
    let handle = spawn_game_loop(config, tick_rate)?;
    handle.send(GameLoopCommand::Player(PlayerCommand::StartMission {
        mission: mission.to_string(),
    }));

    let mut pilot = ScriptedPilot::new();
    let period = tick_duration(tick_rate);
    let mut last_tick = None;
    let mut ended = None;
    let mut latest = GameStateSnapshot::default();

    // Also bounded by polls, in case the mission never starts.
    let max_polls = max_ticks.saturating_mul(4).saturating_add(1000);
    for _ in 0..max_polls {
        std::thread::sleep(period);
        let Some(snapshot) = handle.latest_snapshot() else {
            continue;
        };
        if last_tick == Some(snapshot.time.tick) {
            continue;
        }
        last_tick = Some(snapshot.time.tick);
        log_events(&snapshot.events);
        if let Some(end) = mission_ended(&snapshot.events) {
            ended = Some(end);
        }

        let over = snapshot.phase == GamePhase::GameOver || snapshot.time.tick >= max_ticks;
        let (input, commands) = pilot.decide(&snapshot);
        latest = snapshot;
        if over {
            break;
        }
        handle.send(GameLoopCommand::Input(input));
        for command in commands {
            handle.send(GameLoopCommand::Player(command));
        }
    }
    handle.shutdown();

    if ended.is_none() && latest.phase == GamePhase::GameOver {
        warn!("mission ended between polls; summary taken from the last snapshot");
    }
    Ok(RunOutcome {
        ticks: latest.time.tick,
        ended,
        snapshot: latest,
    })
}
