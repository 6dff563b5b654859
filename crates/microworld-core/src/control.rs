//! Shared run control for the simulation loop.
//!
//! [`RunControl`] is shared (via [`Arc`](std::sync::Arc)) between the loop
//! and whoever may stop it, such as a Ctrl-C handler. The stop flag is an
//! atomic read lock-free between turns. Stops are cooperative: the loop
//! only looks at the flag between turns.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimulationBoundsConfig;

/// Why a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_turns` limit.
    MaxTurnsReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// A stop was requested.
    OperatorStop,
}

/// Stop flag, pacing, and boundaries for one run.
#[derive(Debug)]
pub struct RunControl {
    stop_requested: AtomicBool,
    turn_interval_ms: u64,
    started_at: DateTime<Utc>,
    max_turns: u64,
    max_real_time_seconds: u64,
}

impl RunControl {
    /// Control state from configured bounds. The clock starts now.
    pub fn new(bounds: &SimulationBoundsConfig) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            turn_interval_ms: bounds.turn_interval_ms,
            started_at: Utc::now(),
            max_turns: bounds.max_turns,
            max_real_time_seconds: bounds.max_real_time_seconds,
        }
    }

    /// Ask the loop to stop before its next turn.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Pause between turns in milliseconds.
    pub const fn turn_interval_ms(&self) -> u64 {
        self.turn_interval_ms
    }

    /// Turn limit (0 = unlimited).
    pub const fn max_turns(&self) -> u64 {
        self.max_turns
    }

    /// Wall-clock limit in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    /// Whether `turn` is the last allowed turn or beyond.
    pub const fn turn_limit_reached(&self, turn: u64) -> bool {
        self.max_turns > 0 && turn >= self.max_turns
    }

    /// Whole seconds since the run started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // Clock steps backwards count as zero.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Whether the wall-clock limit has passed.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }
}
