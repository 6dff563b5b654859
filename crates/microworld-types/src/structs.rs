//! Core value structs shared across the workspace.
//!
//! Everything here is plain data: positions, inventories, the resource status
//! and signal maps handed to the advisor, the advisor's tuning action, and the
//! per-turn result and snapshot shapes returned by the world.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actions::BehaviorEvent;
use crate::enums::Item;
use crate::ids::AgentId;

/// Item counts owned by a single agent. Absent keys mean zero.
pub type Inventory = BTreeMap<Item, u32>;

/// Named numeric signals handed to a planner.
pub type Signals = BTreeMap<String, f64>;

/// Named per-turn metrics.
pub type Metrics = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A cell coordinate on the square grid.
///
/// Positions are not bounds-checked on construction; the grid validates them
/// against its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: `max(|dx|, |dy|)`.
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Resource status
// ---------------------------------------------------------------------------

/// Grid-wide resource totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatus {
    /// Total wood on the grid.
    pub wood: u64,
    /// Total flint on the grid.
    pub flint: u64,
    /// Total food on the grid.
    pub food: u64,
    /// `(wood + flint + food) / cell_count`.
    pub avg_per_cell: f64,
}

impl ResourceStatus {
    /// Build a status from per-kind totals and the number of grid cells.
    ///
    /// A zero `cell_count` yields an average of zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_totals(wood: u64, flint: u64, food: u64, cell_count: u64) -> Self {
        let total = wood.saturating_add(flint).saturating_add(food);
        let avg_per_cell = if cell_count == 0 {
            0.0
        } else {
            total as f64 / cell_count as f64
        };
        Self {
            wood,
            flint,
            food,
            avg_per_cell,
        }
    }

    /// Sum of all three kinds.
    pub const fn total(&self) -> u64 {
        self.wood.saturating_add(self.flint).saturating_add(self.food)
    }

    /// Flatten into the signal map a planner consumes.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_signals(&self) -> Signals {
        let mut signals = Signals::new();
        signals.insert("wood".to_owned(), self.wood as f64);
        signals.insert("flint".to_owned(), self.flint as f64);
        signals.insert("food".to_owned(), self.food as f64);
        signals.insert("avg_per_cell".to_owned(), self.avg_per_cell);
        signals
    }
}

// ---------------------------------------------------------------------------
// Advisor output
// ---------------------------------------------------------------------------

/// The advisor's tuning decision for one turn.
///
/// Only `resource_regen_multiplier` is consumed by the kernel; the other
/// fields are passed through for external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorAction {
    /// Scales the base regeneration probability. Always finite and `>= 0`.
    pub resource_regen_multiplier: f64,
    /// Opaque terrain hints from the planner.
    pub terrain_adjustments: Option<serde_json::Value>,
    /// Opaque skill hints from the planner.
    pub skill_updates: Option<serde_json::Value>,
}

impl AdvisorAction {
    /// Baseline multiplier used whenever a planner cannot be trusted.
    pub const BASELINE_MULTIPLIER: f64 = 1.0;

    /// The always-safe action: baseline regeneration, no hints.
    pub const fn baseline() -> Self {
        Self {
            resource_regen_multiplier: Self::BASELINE_MULTIPLIER,
            terrain_adjustments: None,
            skill_updates: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Turn output and snapshots
// ---------------------------------------------------------------------------

/// Everything one call to `World::step` produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// The turn number that was executed.
    pub turn: u64,
    /// One event per agent, in registration order.
    pub events: Vec<BehaviorEvent>,
    /// Post-turn metrics.
    pub metrics: Metrics,
}

/// Static world dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDims {
    /// Side length of the square grid.
    pub size: u32,
}

/// One agent as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent id.
    pub id: AgentId,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Current inventory.
    pub inventory: Inventory,
}

/// A read-only copy of the world for export and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// World dimensions.
    pub world: WorldDims,
    /// Agents in registration order.
    pub agents: Vec<AgentSnapshot>,
    /// Metrics from the most recent turn (empty before the first turn).
    pub metrics: Metrics,
    /// Per-cell resource sum, indexed `[y][x]`.
    pub resources_heat: Vec<Vec<u32>>,
}
