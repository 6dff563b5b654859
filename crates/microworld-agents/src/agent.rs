//! The agent: identity plus a position and an inventory.
//!
//! An agent runs perceive → decide → act each turn. None of those steps
//! mutates anything; the world settles the resulting event afterwards and is
//! the only writer of an agent's position and inventory.

use microworld_types::{Action, AgentId, BehaviorEvent, Inventory, Position};
use microworld_world::WorldView;
use tracing::debug;

use crate::policy::{self, DecisionContext, TRADE_RADIUS};

/// A simulated agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    name: String,
    position: Position,
    inventory: Inventory,
}

impl Agent {
    /// Create an agent with an empty inventory.
    pub const fn new(id: AgentId, name: String, position: Position) -> Self {
        Self {
            id,
            name,
            position,
            inventory: Inventory::new(),
        }
    }

    /// Create an agent holding a starting inventory.
    ///
    /// Zero counts are dropped so the inventory never holds explicit zeros.
    pub fn with_inventory(
        id: AgentId,
        name: String,
        position: Position,
        mut inventory: Inventory,
    ) -> Self {
        inventory.retain(|_, qty| *qty > 0);
        Self {
            id,
            name,
            position,
            inventory,
        }
    }

    /// Stable id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current inventory.
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Move-settlement entry point. Only the world's settlement calls this.
    pub const fn relocate(&mut self, to: Position) {
        self.position = to;
    }

    /// Settlement access to the inventory. Only the world's settlement calls this.
    pub const fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Gather what this agent can see into a decision context.
    pub fn perceive(&self, view: &dyn WorldView, vision_radius: u32) -> DecisionContext {
        DecisionContext {
            position: self.position,
            inventory: self.inventory.clone(),
            visible: view.get_visible(self.position, vision_radius),
            neighbors: view.get_neighbors(self.position, TRADE_RADIUS),
            signals: view.get_signals(),
        }
    }

    /// Choose an action from a context.
    pub fn decide(&self, ctx: &DecisionContext) -> Action {
        let action = policy::decide(ctx);
        debug!(agent_id = %self.id, action = action.name(), "agent decided");
        action
    }

    /// Wrap an action into this turn's event. Produces no side effects.
    pub fn act(&self, turn: u64, action: Action) -> BehaviorEvent {
        BehaviorEvent::new(self.id, turn, action)
    }
}
