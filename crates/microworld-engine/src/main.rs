//! Engine binary for the Microworld simulation.
//!
//! This is the main entry point that wires together configuration, the
//! world, the advisor, and the run loop. It loads configuration, builds the
//! world and planner, and runs turns until a boundary or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `microworld-config.yaml`
//! 3. Build the planner and advisor
//! 4. Create the world from the seed
//! 5. Create run control from simulation bounds
//! 6. Install the Ctrl-C stop handler
//! 7. Run the simulation loop on a blocking thread
//! 8. Log the result

mod error;
mod planner;
mod report;

use std::env;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use microworld_advisor::Advisor;
use microworld_core::config::SimulationConfig;
use microworld_core::{RunControl, World, runner};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::{LatestSnapshot, ReportCallback};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "MICROWORLD_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
const DEFAULT_CONFIG_PATH: &str = "microworld-config.yaml";

/// Turns between progress reports.
const REPORT_EVERY: u64 = 10;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the run-loop task
/// does not complete.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("microworld-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        size = config.world.size,
        seed = config.world.seed,
        num_agents = config.world.num_agents,
        planner = ?config.advisor.planner,
        "Configuration loaded"
    );

    // 3-4. Planner, advisor, and world.
    let (mut world, mut advisor) = assemble(&config, Handle::current())?;
    info!(
        agents = world.agents().len(),
        planner = advisor.planner_name(),
        "World created"
    );

    // 5. Create run control.
    let control = Arc::new(RunControl::new(&config.simulation));
    info!(
        max_turns = control.max_turns(),
        max_real_time_seconds = control.max_real_time_seconds(),
        turn_interval_ms = control.turn_interval_ms(),
        "Run control initialized"
    );

    // 6. Stop after the current turn on Ctrl-C.
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current turn");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 7. Run the simulation. Planner calls block, so the loop gets its own
    //    thread and the runtime stays free to drive provider futures.
    let latest: LatestSnapshot = Arc::new(RwLock::new(None));
    let mut callback = ReportCallback::new(Arc::clone(&latest), REPORT_EVERY);
    let run_control = Arc::clone(&control);
    let (world, advisor, result) = tokio::task::spawn_blocking(move || {
        let result =
            runner::run_simulation(&mut world, &mut advisor, &run_control, &mut callback);
        (world, advisor, result)
    })
    .await
    .map_err(|e| EngineError::Task {
        message: e.to_string(),
    })?;

    // 8. Log results.
    runner::log_simulation_end(&result);

    let stats = advisor.stats();
    info!(
        event_total = stats.event_total,
        adjust_count = stats.adjust_count,
        last_regen = stats.last_regen,
        by_name = ?stats.event_by_name,
        "advisor summary"
    );

    let status = world.compute_resource_status();
    info!(
        wood = status.wood,
        flint = status.flint,
        food = status.food,
        avg_per_cell = status.avg_per_cell,
        "final resource status"
    );

    if let Ok(slot) = latest.read()
        && let Some(snapshot) = slot.as_ref()
    {
        let held: u64 = snapshot
            .agents
            .iter()
            .map(|agent| agent.inventory.values().copied().map(u64::from).sum::<u64>())
            .sum();
        info!(
            agents = snapshot.agents.len(),
            items_held = held,
            "latest snapshot"
        );
    }

    info!(
        end_reason = ?result.end_reason,
        total_turns = result.total_turns,
        "microworld-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// Reads the path in `MICROWORLD_CONFIG`, falling back to
/// `microworld-config.yaml` in the working directory. A missing file means
/// defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        info!(path = %config_path.display(), "Loading config file");
        Ok(SimulationConfig::from_file(&config_path)?)
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

/// Build the world and an advisor backed by the configured planner.
fn assemble(config: &SimulationConfig, handle: Handle) -> Result<(World, Advisor), EngineError> {
    let planner = planner::build_planner(&config.advisor, handle)?;
    let world = World::with_config(&config.world, &config.economy)?;
    Ok((world, Advisor::new(planner)))
}
