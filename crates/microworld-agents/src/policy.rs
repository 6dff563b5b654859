//! The rule-list decision policy.
//!
//! [`decide`] is a pure function of a [`DecisionContext`]. Rules are checked
//! in a fixed order and the first match wins:
//!
//! 1. Holding wood and flint but no spear: craft a spear.
//! 2. No flint, some food, and someone within reach: offer food for flint.
//! 3. Anything on the current cell: forage one unit.
//! 4. A richer visible cell exists: move there.
//! 5. Otherwise forage anyway. Settlement turns this into a no-op, and the
//!    agent still emits its one event for the turn.

use microworld_types::{Action, AgentId, Inventory, Item, Position, Recipe, Signals};
use microworld_world::{CellStock, stock_sum};

use crate::inventory::{count, has_item};

/// Radius within which agents can trade with each other.
pub const TRADE_RADIUS: u32 = 1;

/// Everything an agent knows when it decides.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext {
    /// Where the agent stands.
    pub position: Position,
    /// A copy of the agent's inventory.
    pub inventory: Inventory,
    /// Visible cells in raster order.
    pub visible: Vec<(Position, CellStock)>,
    /// Other agents within [`TRADE_RADIUS`].
    pub neighbors: Vec<AgentId>,
    /// Advisory signals. Carried for richer policies; the rule list ignores them.
    pub signals: Signals,
}

impl DecisionContext {
    /// Resource counts at the agent's own cell, if visible.
    pub fn current_cell(&self) -> Option<&CellStock> {
        self.visible
            .iter()
            .find(|(pos, _)| *pos == self.position)
            .map(|(_, stock)| stock)
    }
}

/// Pick an action for this turn.
pub fn decide(ctx: &DecisionContext) -> Action {
    let inv = &ctx.inventory;

    // Rule 1
    if has_item(inv, Item::Wood, 1) && has_item(inv, Item::Flint, 1) && count(inv, Item::Spear) < 1
    {
        return Action::Craft {
            recipe: Recipe::Spear,
        };
    }

    // Rule 2
    if count(inv, Item::Flint) == 0 && has_item(inv, Item::Food, 1) && !ctx.neighbors.is_empty() {
        return Action::Trade {
            offer: Item::Food,
            request: Item::Flint,
        };
    }

    // Rule 3
    if ctx
        .current_cell()
        .is_some_and(|stock| stock.values().any(|&qty| qty > 0))
    {
        return Action::Forage { amount: 1 };
    }

    // Rule 4: strictly positive best score, first in scan order on ties.
    let mut best: Option<(Position, u32)> = None;
    for (pos, stock) in &ctx.visible {
        let score = stock_sum(stock);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((*pos, score));
        }
    }
    if let Some((target, _)) = best
        && target != ctx.position
    {
        return Action::Move { to: target };
    }

    // Rule 5
    Action::Forage { amount: 1 }
}
