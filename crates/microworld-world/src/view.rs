//! The read-only capability an agent decides through.
//!
//! A [`WorldView`] is built for one viewing agent and exposes exactly three
//! queries. Decision logic never sees the grid or the agent registry
//! directly, so it cannot mutate shared state and can be tested against a
//! hand-built view.

use microworld_types::{AgentId, Position, Signals};

use crate::grid::CellStock;

/// Read-only queries available to decision logic.
pub trait WorldView {
    /// Every on-grid cell within Chebyshev distance `radius` of `position`
    /// (inclusive), in raster order, with a copy of its resource counts.
    fn get_visible(&self, position: Position, radius: u32) -> Vec<(Position, CellStock)>;

    /// Ids of agents other than the viewer within Chebyshev distance
    /// `radius` of `position`, in registration order.
    fn get_neighbors(&self, position: Position, radius: u32) -> Vec<AgentId>;

    /// Advisory scarcity signals. May be empty.
    fn get_signals(&self) -> Signals;
}
