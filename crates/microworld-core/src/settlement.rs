//! Settlement: applying one agent's event to shared state.
//!
//! Settlement runs immediately after each agent acts, so later agents in the
//! same turn see the result. Anything that cannot be carried out (an empty
//! cell, missing inputs, no trading partner) is a silent no-op, reported as
//! [`Outcome::NoOp`] for logging only.

use std::collections::BTreeSet;

use microworld_agents::inventory::{self, add_item, count};
use microworld_agents::{Agent, TRADE_RADIUS};
use microworld_types::{Action, AgentId, Item, Position, Recipe, ResourceKind};
use microworld_world::{ResourceGrid, WorldError, harvest_richest};
use tracing::{debug, warn};

/// What settlement did with an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The agent moved.
    Moved {
        /// New position.
        to: Position,
    },
    /// The agent harvested these units, in order.
    Foraged {
        /// One entry per unit taken.
        taken: Vec<ResourceKind>,
    },
    /// The agent crafted one unit.
    Crafted {
        /// The recipe used.
        recipe: Recipe,
    },
    /// The agent swapped one unit with a partner.
    Traded {
        /// The other participant.
        partner: AgentId,
    },
    /// Nothing changed.
    NoOp,
}

/// Settle `action` for the agent at `index`.
///
/// `traded` holds every agent that completed a trade this turn; an agent
/// takes part in at most one.
pub fn settle(
    grid: &mut ResourceGrid,
    agents: &mut [Agent],
    index: usize,
    action: &Action,
    traded: &mut BTreeSet<AgentId>,
) -> Outcome {
    let outcome = match *action {
        Action::Move { to } => settle_move(grid, agents, index, to),
        Action::Forage { amount } => settle_forage(grid, agents, index, amount),
        Action::Craft { recipe } => settle_craft(agents, index, recipe),
        Action::Trade { offer, request } => settle_trade(agents, index, offer, request, traded),
    };
    debug!(index, action = action.name(), outcome = ?outcome, "settled");
    outcome
}

fn settle_move(grid: &ResourceGrid, agents: &mut [Agent], index: usize, to: Position) -> Outcome {
    if !grid.contains(to) {
        return Outcome::NoOp;
    }
    match agents.get_mut(index) {
        Some(agent) => {
            agent.relocate(to);
            Outcome::Moved { to }
        }
        None => Outcome::NoOp,
    }
}

fn settle_forage(
    grid: &mut ResourceGrid,
    agents: &mut [Agent],
    index: usize,
    amount: u32,
) -> Outcome {
    let Some(agent) = agents.get_mut(index) else {
        return Outcome::NoOp;
    };
    match forage_units(grid, agent, amount) {
        Ok(taken) if !taken.is_empty() => Outcome::Foraged { taken },
        Ok(_) => Outcome::NoOp,
        Err(e) => {
            warn!(agent_id = %agent.id(), error = %e, "forage failed");
            Outcome::NoOp
        }
    }
}

/// Harvest up to `amount` units into the agent's inventory. A unit the
/// agent cannot carry goes back to its cell.
fn forage_units(
    grid: &mut ResourceGrid,
    agent: &mut Agent,
    amount: u32,
) -> Result<Vec<ResourceKind>, WorldError> {
    let position = agent.position();
    let mut taken = Vec::new();
    for _ in 0..amount {
        let Some(kind) = harvest_richest(grid, position)? else {
            break;
        };
        if add_item(agent.inventory_mut(), kind.item(), 1).is_err() {
            let slot = grid.cell_mut(position)?.entry(kind).or_insert(0);
            *slot = slot.checked_add(1).ok_or(WorldError::ArithmeticOverflow)?;
            break;
        }
        taken.push(kind);
    }
    Ok(taken)
}

fn settle_craft(agents: &mut [Agent], index: usize, recipe: Recipe) -> Outcome {
    let Some(agent) = agents.get_mut(index) else {
        return Outcome::NoOp;
    };
    match inventory::craft(agent.inventory_mut(), recipe) {
        Ok(()) => Outcome::Crafted { recipe },
        Err(_) => Outcome::NoOp,
    }
}

fn settle_trade(
    agents: &mut [Agent],
    index: usize,
    offer: Item,
    request: Item,
    traded: &mut BTreeSet<AgentId>,
) -> Outcome {
    let Some(initiator) = agents.get(index) else {
        return Outcome::NoOp;
    };
    if traded.contains(&initiator.id()) {
        return Outcome::NoOp;
    }
    let origin = initiator.position();

    let partner_index = agents.iter().enumerate().position(|(i, other)| {
        i != index
            && !traded.contains(&other.id())
            && other.position().chebyshev(origin) <= TRADE_RADIUS
            && count(other.inventory(), request) >= 1
    });
    let Some(partner_index) = partner_index else {
        return Outcome::NoOp;
    };
    let Some((initiator, partner)) = pair_mut(agents, index, partner_index) else {
        return Outcome::NoOp;
    };

    if inventory::swap_one(
        initiator.inventory_mut(),
        partner.inventory_mut(),
        offer,
        request,
    )
    .is_err()
    {
        return Outcome::NoOp;
    }

    let partner_id = partner.id();
    traded.insert(initiator.id());
    traded.insert(partner_id);
    Outcome::Traded {
        partner: partner_id,
    }
}

/// Two distinct agents borrowed mutably, in argument order.
fn pair_mut(agents: &mut [Agent], first: usize, second: usize) -> Option<(&mut Agent, &mut Agent)> {
    if first < second {
        let (head, tail) = agents.split_at_mut(second);
        Some((head.get_mut(first)?, tail.first_mut()?))
    } else if second < first {
        let (head, tail) = agents.split_at_mut(first);
        Some((tail.first_mut()?, head.get_mut(second)?))
    } else {
        None
    }
}
