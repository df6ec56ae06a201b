use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rail_sim::simulation::{
    state_summary, train_summary, EngineConfig, NetworkData, NetworkStats, SimEngine, TrainId,
};

#[derive(Parser)]
#[command(name = "rail_sim")]
#[command(about = "Deterministic rail network simulation (headless)")]
struct Cli {
    /// Directory holding stations.json, sections.json and trains.json
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// JSON file overriding engine constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to run
    #[arg(long, default_value = "100000")]
    ticks: u64,

    /// Speed multiplier (simulated seconds per tick)
    #[arg(long, default_value = "1")]
    speed: u32,

    /// Pace ticks at 100ms of wall time each
    #[arg(long)]
    realtime: bool,

    /// Print a summary every N ticks (0 disables)
    #[arg(long, default_value = "0")]
    summary_every: u64,

    /// Print the event log at the end
    #[arg(long)]
    events: bool,

    /// Print the advisory summary for this train at the end
    #[arg(long)]
    train: Option<String>,

    /// Write the final snapshot as JSON to this file
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation without any presentation layer
fn run_headless(cli: &Cli) -> Result<()> {
    let data = NetworkData::load_dir(&cli.data)
        .with_context(|| format!("Failed to load data from {}", cli.data.display()))?;

    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid engine config")?;

    let mut engine = SimEngine::with_data(config, data)
        .context("Simulation data failed validation")?;
    engine.set_speed(cli.speed)?;

    println!("Running rail simulation in headless mode...");
    println!("Max ticks: {}, Speed: x{}", cli.ticks, cli.speed);
    println!();

    engine.start();
    let mut tick = 0;
    while tick < cli.ticks && engine.is_running() {
        engine.tick()?;
        tick += 1;

        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            println!("--- After tick {} ---", tick);
            println!("{}", state_summary(&engine.snapshot(), engine.network()));
            println!();
        }

        if cli.realtime {
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    let state = engine.snapshot();
    println!("=== Final State ===");
    println!("{}", state_summary(&state, engine.network()));

    if cli.events {
        println!();
        println!("=== Event Log ===");
        for event in &state.events {
            println!("{}", event);
        }
    }

    if let Some(train_id) = &cli.train {
        let train_id = TrainId::new(train_id.as_str());
        let summary = train_summary(&state, &train_id)
            .with_context(|| format!("Unknown train {}", train_id))?;
        println!();
        println!("{}", summary);
    }

    if let Some(path) = &cli.snapshot {
        let json = serde_json::to_string_pretty(&state).context("Failed to serialize snapshot")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let stats = NetworkStats::from_state(&state);
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", tick);
    info!("Simulated time: {:.1}s", state.time);
    info!("Status: {:?}", state.status);
    info!("Total trains: {}", stats.total_trains);
    info!("Trains finished: {}", stats.finished);
    info!("Average delay: {:.1}s", stats.average_delay_s);
    info!("Throughput: {:.1} trains/hour", stats.throughput_per_hour);

    Ok(())
}
