//! Closest-target acquisition runner.
//!
//! Loads a scenario (`acquire run scenario.toml`), drives the pickup task
//! against the simulated world and reports how the run ended.

use std::path::{Path, PathBuf};

use acquire::exit_codes;
use acquire::io::config::{AcquireConfig, CONFIG_PATH, load_config, write_config};
use acquire::io::scenario::Scenario;
use acquire::logging;
use acquire::looping::{LoopOutcome, LoopStop, run_loop};
use acquire::task::PickupDroppedItemTask;
use acquire::world::TracingDiagnostics;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "acquire",
    version,
    about = "Closest-target acquisition runner for simulated worlds"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.acquire/config.toml` with default values if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a scenario file (and the config) without running it.
    Validate {
        scenario: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the pickup task described by a scenario until it stops.
    Run {
        scenario: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override `simulation.max_ticks`.
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(force),
        Command::Validate { scenario, config } => cmd_validate(&scenario, config.as_deref()),
        Command::Run {
            scenario,
            config,
            max_ticks,
            json,
        } => cmd_run(&scenario, config.as_deref(), max_ticks, json),
    }
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = Path::new(CONFIG_PATH);
    if !force && path.exists() {
        debug!(path = %path.display(), "config exists, leaving it untouched");
        return Ok(exit_codes::OK);
    }
    write_config(path, &AcquireConfig::default()).context("write .acquire/config.toml")?;
    Ok(exit_codes::OK)
}

fn cmd_validate(scenario: &Path, config: Option<&Path>) -> Result<i32> {
    load_config(config.unwrap_or(Path::new(CONFIG_PATH)))?;
    let scenario = Scenario::load(scenario)?;
    println!(
        "ok: items={} blocked={} task={}",
        scenario.items.len(),
        scenario.blocked.len(),
        scenario.task.targets
    );
    Ok(exit_codes::OK)
}

fn cmd_run(
    scenario_path: &Path,
    config: Option<&Path>,
    max_ticks: Option<u64>,
    json: bool,
) -> Result<i32> {
    let mut cfg = load_config(config.unwrap_or(Path::new(CONFIG_PATH)))?;
    if let Some(max_ticks) = max_ticks {
        cfg.simulation.max_ticks = max_ticks;
        cfg.validate()?;
    }
    let scenario = Scenario::load(scenario_path)?;

    let mut world = scenario.build_world(&cfg.simulation);
    let mut task = PickupDroppedItemTask::new(scenario.task.clone(), &cfg.task_config());
    info!(
        task = %task,
        scenario = %scenario_path.display(),
        grounded = task.requires_grounded(),
        "starting run"
    );

    let outcome = run_loop(
        &mut task,
        &mut world,
        &mut TracingDiagnostics,
        cfg.loop_limits(),
        |tick, outcome| debug!(tick, ?outcome, "tick"),
    );

    if json {
        let payload = serde_json::to_string_pretty(&outcome).context("serialize run report")?;
        println!("{payload}");
    } else {
        print_report(&outcome);
    }

    Ok(match outcome.stop {
        LoopStop::Complete => exit_codes::OK,
        LoopStop::Exhausted { .. } => exit_codes::EXHAUSTED,
        LoopStop::MaxTicksExceeded { .. } => exit_codes::MAX_TICKS,
    })
}

fn print_report(outcome: &LoopOutcome) {
    println!("run: task={} ticks={}", outcome.task, outcome.ticks);
    for pickup in &outcome.pickups {
        println!(
            "run: picked {} {} at tick {}",
            pickup.kind, pickup.id, pickup.tick
        );
    }
    if !outcome.blacklisted.is_empty() {
        let ids: Vec<String> = outcome.blacklisted.iter().map(|id| id.to_string()).collect();
        println!(
            "run: blacklisted [{}] recoveries={}",
            ids.join(", "),
            outcome.recoveries
        );
    }
    println!("run: stop={:?}", outcome.stop);
}
