use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use starfleet_app::runner::{run_headless, run_realtime};
use starfleet_app::telemetry::init_telemetry;
use starfleet_core::config::Content;
use starfleet_sim::SimConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless starship combat simulation", long_about = None)]
struct Cli {
    /// Mission roster key.
    #[arg(long, default_value = "patrol")]
    mission: String,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Stop after this many ticks if the mission is still running.
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,
    /// JSON content file replacing the built-in enemies, missions and upgrades.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Log filter, overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long)]
    json_logs: bool,
    /// Run on the fixed-rate game loop thread instead of fast-forward.
    #[arg(long)]
    realtime: bool,
    /// Tick rate in Hz for --realtime.
    #[arg(long, default_value_t = 60)]
    rate: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli.log_level, cli.json_logs);

    let content = match &cli.content {
        Some(path) => Content::load(path)
            .with_context(|| format!("load content from {}", path.display()))?,
        None => Content::default(),
    };
    content
        .mission(&cli.mission)
        .with_context(|| format!("choose mission '{}'", cli.mission))?;

    let config = SimConfig {
        seed: cli.seed,
        content,
    };
    info!(mission = %cli.mission, seed = cli.seed, realtime = cli.realtime, "launching");

    let outcome = if cli.realtime {
        run_realtime(config, &cli.mission, cli.ticks, cli.rate).context("run game loop")?
    } else {
        run_headless(config, &cli.mission, cli.ticks)
    };

    match &outcome.ended {
        Some((victory, summary)) => info!(
            victory,
            mission = %summary.mission,
            waves = summary.waves_completed,
            kills = summary.enemies_destroyed,
            credits = summary.credits,
            fleet = ?summary.fleet_surviving,
            "mission summary"
        ),
        None => info!(
            ticks = outcome.ticks,
            wave = outcome.snapshot.wave,
            hull = outcome.snapshot.ship.hull,
            "stopped before the mission ended"
        ),
    }

    let report = outcome.report(&cli.mission, cli.seed);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize run report")?
    );
    Ok(())
}
