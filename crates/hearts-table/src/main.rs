use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use hearts_core::AppInfo;
use hearts_table::config::{ResolvedOutputs, TableConfig};
use hearts_table::logging::init_logging;
use hearts_table::runner::TableRunner;

/// Plays games of Hearts between configured agents and records the results.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-table",
    author,
    version,
    about = "Seeded Hearts table for bots and console players"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "table/table.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the score that ends a game.
    #[arg(long, value_name = "POINTS")]
    target_score: Option<u32>,

    /// Take over a seat (1-4) from the console.
    #[arg(long, value_name = "SEAT", value_parser = clap::value_parser!(u8).range(1..=4))]
    interactive: Option<u8>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = TableConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(target_score) = cli.target_score {
        config.rules.target_score = target_score;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let target_score = config.rules.target_score;

    println!(
        "{} {}: loaded configuration '{run_id}' ({games} game{} to {target_score} points)",
        AppInfo::name(),
        AppInfo::version(),
        if games == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)
        .context("initialising structured logging")?;
    let mut runner = TableRunner::new(config, outputs)?;
    if let Some(seat) = cli.interactive {
        runner = runner.with_console_seat(usize::from(seat) - 1)?;
    }

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner
        .run()
        .with_context(|| format!("running table '{run_id}'"))?;
    println!(
        "Run complete for '{run_id}': {} games, {} rounds -> {} rows at {}",
        summary.games_played,
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for agent in &summary.table.agents {
        println!(
            "  {:<16} wins {:>3}  avg score {:>6.2}  moons {}",
            agent.name,
            agent.wins,
            agent.avg_score(),
            agent.moons
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Event log: {}", guard.log_path.display());
    }

    Ok(())
}
