//! Agent intents and the events that carry them into settlement.
//!
//! An [`Action`] is pure data produced by an agent's decision. Wrapping it in
//! a [`BehaviorEvent`] stamps it with the agent and turn; the world consumes
//! each event exactly once, in the turn it was produced.

use serde::{Deserialize, Serialize};

use crate::enums::{Item, Recipe};
use crate::ids::AgentId;
use crate::structs::Position;

/// What an agent intends to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Step to a visible cell.
    Move {
        /// Target cell.
        to: Position,
    },
    /// Take resources from the current cell.
    Forage {
        /// Units requested. Settlement takes at most one unit per turn.
        amount: u32,
    },
    /// Turn inventory items into a crafted item.
    Craft {
        /// The recipe to apply.
        recipe: Recipe,
    },
    /// Swap one unit with a nearby agent.
    Trade {
        /// Item given away.
        offer: Item,
        /// Item wanted in return.
        request: Item,
    },
}

impl Action {
    /// Event name for this action, used for histograms and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Forage { .. } => "forage",
            Self::Craft { .. } => "craft",
            Self::Trade { .. } => "trade",
        }
    }
}

/// An agent's declared intent for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    /// The agent that produced the event.
    pub agent_id: AgentId,
    /// Event name, derived from the action.
    pub name: String,
    /// The turn the event belongs to.
    pub turn: u64,
    /// The intent itself.
    pub data: Action,
}

impl BehaviorEvent {
    /// Stamp an action with its agent and turn.
    pub fn new(agent_id: AgentId, turn: u64, action: Action) -> Self {
        Self {
            agent_id,
            name: action.name().to_owned(),
            turn,
            data: action,
        }
    }
}
