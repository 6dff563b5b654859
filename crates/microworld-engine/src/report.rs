//! Turn callback that keeps the latest snapshot and logs progress.
//!
//! After each turn the callback replaces the shared [`WorldSnapshot`] and,
//! every `report_every` turns, logs the turn's metrics.

use std::sync::{Arc, RwLock};

use microworld_core::{TurnCallback, World};
use microworld_types::{TurnResult, WorldSnapshot};
use tracing::{debug, info};

/// Shared slot holding the most recent snapshot.
pub type LatestSnapshot = Arc<RwLock<Option<WorldSnapshot>>>;

/// Callback that records snapshots and reports periodically.
pub struct ReportCallback {
    latest: LatestSnapshot,
    report_every: u64,
}

impl ReportCallback {
    /// Report every `report_every` turns (0 disables periodic reports).
    pub const fn new(latest: LatestSnapshot, report_every: u64) -> Self {
        Self {
            latest,
            report_every,
        }
    }
}

impl TurnCallback for ReportCallback {
    fn on_turn(&mut self, result: &TurnResult, world: &World) {
        // Skip the update if a reader holds the lock; the next turn catches up.
        if let Ok(mut slot) = self.latest.try_write() {
            *slot = Some(world.snapshot());
        }

        debug!(turn = result.turn, events = result.events.len(), "turn recorded");

        if result.turn.checked_rem(self.report_every) == Some(0) {
            let metric = |key: &str| result.metrics.get(key).copied().unwrap_or_default();
            info!(
                turn = result.turn,
                actions = metric("actions_per_turn"),
                wood = metric("resource_wood"),
                flint = metric("resource_flint"),
                food = metric("resource_food"),
                spears = metric("inv_spear"),
                scarcity = metric("scarcity"),
                multiplier = metric("regen_multiplier"),
                "progress"
            );
        }
    }
}
