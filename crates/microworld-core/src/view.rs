//! The per-agent read-only view of a [`World`].

use microworld_types::{AgentId, Position, Signals};
use microworld_world::{CellStock, WorldView};

use crate::world::World;

/// A [`WorldView`] over one world, as seen by one agent.
///
/// The viewer never appears among its own neighbors.
pub struct AgentView<'a> {
    world: &'a World,
    viewer: AgentId,
}

impl<'a> AgentView<'a> {
    /// View of `world` for the agent `viewer`.
    pub const fn new(world: &'a World, viewer: AgentId) -> Self {
        Self { world, viewer }
    }
}

impl WorldView for AgentView<'_> {
    fn get_visible(&self, position: Position, radius: u32) -> Vec<(Position, CellStock)> {
        self.world.grid().window(position, radius)
    }

    fn get_neighbors(&self, position: Position, radius: u32) -> Vec<AgentId> {
        self.world
            .agents()
            .iter()
            .filter(|agent| agent.id() != self.viewer)
            .filter(|agent| agent.position().chebyshev(position) <= radius)
            .map(microworld_agents::Agent::id)
            .collect()
    }

    fn get_signals(&self) -> Signals {
        self.world.scarcity_signals()
    }
}
