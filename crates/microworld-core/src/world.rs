//! The world: resource grid, agent registry, and the turn pipeline.
//!
//! [`World::step`] runs one turn:
//!
//! 1. **Agents** -- in registration order, each agent perceives through an
//!    [`AgentView`], decides, acts, and its event is settled immediately, so
//!    later agents see earlier settlements.
//! 2. **Advisor** -- the advisor observes the full event batch and returns a
//!    tuning action computed from the world's resource signals.
//! 3. **Regeneration** -- empty cells regrow under the advisor's multiplier.
//! 4. **Metrics** -- computed on the post-regeneration state.
//!
//! Given a seed and registration order, everything except planner output is
//! reproducible.

use std::collections::BTreeSet;

use microworld_advisor::{Advisor, SignalError, SignalSource};
use microworld_agents::Agent;
use microworld_agents::inventory::total_of;
use microworld_types::{
    AgentId, AgentSnapshot, Inventory, Item, Metrics, Position, ResourceKind, ResourceStatus,
    Signals, TurnResult, WorldDims, WorldSnapshot,
};
use microworld_world::{
    CellStock, RegenProbabilities, ResourceGrid, WorldError, regenerate, scarcity,
    scarcity_signals,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{EconomyConfig, WorldConfig};
use crate::settlement::{self, Outcome};
use crate::view::AgentView;

/// Mixed into the seed for the regeneration stream.
const REGEN_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// A self-contained simulated world.
///
/// Independent worlds share nothing and can run on separate threads.
#[derive(Debug)]
pub struct World {
    grid: ResourceGrid,
    agents: Vec<Agent>,
    next_agent_id: u32,
    vision_radius: u32,
    regen: RegenProbabilities,
    scarcity_reference: f64,
    regen_rng: StdRng,
    last_metrics: Metrics,
}

impl World {
    /// A world with the default economy and vision radius.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSize`] for a zero size.
    pub fn new(size: u32, seed: u64, num_agents: u32) -> Result<Self, WorldError> {
        let world = WorldConfig {
            size,
            seed,
            num_agents,
            ..WorldConfig::default()
        };
        Self::with_config(&world, &EconomyConfig::default())
    }

    /// A world built from configuration.
    ///
    /// The grid is drawn first, then one seeded position per agent. Agents
    /// are named `agent-<n>` with ids from zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSize`] for a zero size, or
    /// [`WorldError::InvalidConfig`] for out-of-range economy values.
    pub fn with_config(world: &WorldConfig, economy: &EconomyConfig) -> Result<Self, WorldError> {
        economy.regen_probability.validate()?;
        if !economy.scarcity_reference.is_finite() || economy.scarcity_reference < 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "scarcity reference must be a non-negative number, got {}",
                economy.scarcity_reference
            )));
        }

        let mut rng = StdRng::seed_from_u64(world.seed);
        let grid = ResourceGrid::seeded(world.size, economy.initial_max_per_kind, &mut rng)?;

        let mut this = Self {
            grid,
            agents: Vec::new(),
            next_agent_id: 0,
            vision_radius: world.vision_radius,
            regen: economy.regen_probability,
            scarcity_reference: economy.scarcity_reference,
            regen_rng: StdRng::seed_from_u64(world.seed ^ REGEN_STREAM),
            last_metrics: Metrics::new(),
        };

        for n in 0..world.num_agents {
            let position = Position::new(
                rng.random_range(0..world.size),
                rng.random_range(0..world.size),
            );
            this.spawn_agent(format!("agent-{n}"), position, Inventory::new())?;
        }

        info!(
            size = world.size,
            seed = world.seed,
            agents = world.num_agents,
            "world created"
        );
        Ok(this)
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Register a new agent at the end of the registration order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOutOfBounds`] for an off-grid position,
    /// or [`WorldError::ArithmeticOverflow`] when ids are exhausted.
    pub fn spawn_agent(
        &mut self,
        name: impl Into<String>,
        position: Position,
        inventory: Inventory,
    ) -> Result<AgentId, WorldError> {
        self.grid.check(position)?;
        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id = self
            .next_agent_id
            .checked_add(1)
            .ok_or(WorldError::ArithmeticOverflow)?;
        self.agents
            .push(Agent::with_inventory(id, name.into(), position, inventory));
        debug!(agent_id = %id, %position, "agent spawned");
        Ok(id)
    }

    /// Overwrite one resource count at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOutOfBounds`] for an off-grid position.
    pub fn set_cell(
        &mut self,
        position: Position,
        kind: ResourceKind,
        quantity: u32,
    ) -> Result<(), WorldError> {
        self.grid.set(position, kind, quantity)
    }

    /// Empty every cell.
    pub fn clear_resources(&mut self) {
        self.grid.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Grid side length.
    pub const fn size(&self) -> u32 {
        self.grid.size()
    }

    /// Radius agents see.
    pub const fn vision_radius(&self) -> u32 {
        self.vision_radius
    }

    /// The resource grid.
    pub const fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    /// Resource counts at one cell.
    pub fn cell(&self, position: Position) -> Option<&CellStock> {
        self.grid.cell(position)
    }

    /// Agents in registration order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// One agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    /// Metrics from the most recent turn; empty before the first.
    pub const fn turn_metrics(&self) -> &Metrics {
        &self.last_metrics
    }

    /// Grid-wide totals and the per-cell average.
    pub fn compute_resource_status(&self) -> ResourceStatus {
        self.grid.status()
    }

    /// Overall and per-kind scarcity.
    pub fn scarcity_signals(&self) -> Signals {
        scarcity_signals(
            &self.compute_resource_status(),
            self.grid.cell_count(),
            self.scarcity_reference,
        )
    }

    /// Read-only copy for export.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            world: WorldDims { size: self.size() },
            agents: self
                .agents
                .iter()
                .map(|agent| AgentSnapshot {
                    id: agent.id(),
                    x: agent.position().x,
                    y: agent.position().y,
                    inventory: agent.inventory().clone(),
                })
                .collect(),
            metrics: self.last_metrics.clone(),
            resources_heat: self.grid.heat(),
        }
    }

    // -----------------------------------------------------------------------
    // Turn pipeline
    // -----------------------------------------------------------------------

    /// Run one turn. Every agent produces exactly one event.
    pub fn step(&mut self, turn: u64, advisor: &mut Advisor) -> TurnResult {
        let mut events = Vec::with_capacity(self.agents.len());
        let mut traded: BTreeSet<AgentId> = BTreeSet::new();

        for index in 0..self.agents.len() {
            let Some(agent) = self.agents.get(index) else {
                continue;
            };
            let view = AgentView::new(self, agent.id());
            let ctx = agent.perceive(&view, self.vision_radius);
            let action = agent.decide(&ctx);
            let event = agent.act(turn, action);

            let outcome = settlement::settle(
                &mut self.grid,
                &mut self.agents,
                index,
                &event.data,
                &mut traded,
            );
            if outcome == Outcome::NoOp {
                debug!(turn, agent_id = %event.agent_id, action = %event.name, "no-op settlement");
            }
            events.push(event);
        }

        advisor.observe(&events);
        let tuning = advisor.adjust(&*self);
        let multiplier = tuning.resource_regen_multiplier;
        let regrown = regenerate(&mut self.grid, &self.regen, multiplier, &mut self.regen_rng);

        let metrics = self.compute_metrics(events.len(), multiplier);
        self.last_metrics.clone_from(&metrics);

        info!(
            turn,
            events = events.len(),
            multiplier,
            regrown,
            scarcity = metrics.get("scarcity").copied().unwrap_or_default(),
            "turn complete"
        );

        TurnResult {
            turn,
            events,
            metrics,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute_metrics(&self, event_count: usize, multiplier: f64) -> Metrics {
        let status = self.compute_resource_status();
        let spears = total_of(self.agents.iter().map(Agent::inventory), Item::Spear);

        let mut metrics = Metrics::new();
        metrics.insert("actions_per_turn".to_owned(), event_count as f64);
        metrics.insert("resource_wood".to_owned(), status.wood as f64);
        metrics.insert("resource_flint".to_owned(), status.flint as f64);
        metrics.insert("resource_food".to_owned(), status.food as f64);
        metrics.insert("inv_spear".to_owned(), spears as f64);
        metrics.insert(
            "scarcity".to_owned(),
            scarcity(status.avg_per_cell, self.scarcity_reference),
        );
        metrics.insert("regen_multiplier".to_owned(), multiplier);
        metrics
    }
}

impl SignalSource for World {
    fn resource_signals(&self) -> Result<Signals, SignalError> {
        let mut signals = self.compute_resource_status().to_signals();
        signals.extend(self.scarcity_signals());
        Ok(signals)
    }
}
