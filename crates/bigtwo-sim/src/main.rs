use std::path::PathBuf;

use clap::Parser;

use bigtwo_sim::config::{ResolvedOutputs, SimConfig};
use bigtwo_sim::logging::init_logging;
use bigtwo_sim::runner::SimulationRunner;

/// Headless Big Two simulation harness.
#[derive(Debug, Parser)]
#[command(
    name = "bigtwo-sim",
    author,
    version,
    about = "Seeded all-CPU Big Two simulations"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the master seed games derive their deals from.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let seats = config.seat_names().join(", ");

    println!("Loaded configuration '{run_id}': {games} game(s), seats {seats}");

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;
    let summary = runner.run()?;

    println!(
        "Simulation complete for '{run_id}': {} games (master seed {}) → {} rows at {}",
        summary.games_played,
        summary.master_seed,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for standing in &summary.standings {
        println!(
            "  {:<5} {:<12} wins {:>4}  avg place {:.2}",
            standing.seat.to_string(),
            standing.name,
            standing.wins(),
            standing.average_place()
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
