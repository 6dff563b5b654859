//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`World::step`] from turn 1 until one of:
//!
//! - **Turn limit**: `max_turns` turns have completed
//! - **Time limit**: `max_real_time_seconds` of wall-clock time have passed
//! - **Stop request**: the shared [`RunControl`] flag was set
//!
//! All checks happen between turns, never mid-settlement. The loop is
//! synchronous; run it on a dedicated or blocking thread.

use std::thread;
use std::time::Duration;

use microworld_advisor::Advisor;
use microworld_types::TurnResult;
use tracing::{info, warn};

use crate::control::{RunControl, SimulationEndReason};
use crate::world::World;

/// Result of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Why the run ended.
    pub end_reason: SimulationEndReason,
    /// The last completed turn, if any.
    pub final_turn: Option<TurnResult>,
    /// Number of turns executed.
    pub total_turns: u64,
}

/// Callback invoked after each turn completes.
pub trait TurnCallback: Send {
    /// Called with each turn's result and the post-turn world.
    fn on_turn(&mut self, result: &TurnResult, world: &World);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _result: &TurnResult, _world: &World) {}
}

/// Run turns until a boundary is reached or a stop is requested.
pub fn run_simulation(
    world: &mut World,
    advisor: &mut Advisor,
    control: &RunControl,
    callback: &mut dyn TurnCallback,
) -> SimulationResult {
    let mut last_turn: Option<TurnResult> = None;
    let mut total_turns: u64 = 0;

    info!(
        max_turns = control.max_turns(),
        max_real_time_seconds = control.max_real_time_seconds(),
        turn_interval_ms = control.turn_interval_ms(),
        planner = advisor.planner_name(),
        "simulation starting"
    );

    loop {
        if control.is_stop_requested() {
            info!(total_turns, "stop requested");
            return SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_turn: last_turn,
                total_turns,
            };
        }

        if control.time_limit_reached() {
            info!(
                max_seconds = control.max_real_time_seconds(),
                elapsed = control.elapsed_seconds(),
                "real-time limit reached"
            );
            return SimulationResult {
                end_reason: SimulationEndReason::MaxRealTimeReached,
                final_turn: last_turn,
                total_turns,
            };
        }

        let turn = total_turns.saturating_add(1);
        let result = world.step(turn, advisor);
        total_turns = turn;

        callback.on_turn(&result, world);

        if control.turn_limit_reached(turn) {
            info!(turn, max_turns = control.max_turns(), "turn limit reached");
            return SimulationResult {
                end_reason: SimulationEndReason::MaxTurnsReached,
                final_turn: Some(result),
                total_turns,
            };
        }

        last_turn = Some(result);

        let interval_ms = control.turn_interval_ms();
        if interval_ms > 0 {
            thread::sleep(Duration::from_millis(interval_ms));
        }
    }
}

/// Log how a run ended.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_turns = result.total_turns,
        final_turn = result.final_turn.as_ref().map(|t| t.turn),
        "simulation ended"
    );

    if let Some(ref last) = result.final_turn {
        info!(
            turn = last.turn,
            metrics = ?last.metrics,
            "final turn metrics"
        );
    } else {
        warn!("simulation ended with no turns executed");
    }
}
