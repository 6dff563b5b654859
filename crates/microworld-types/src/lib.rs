//! Shared value types for the Microworld simulation kernel.
//!
//! This crate is the single source of truth for the plain data that flows
//! between the grid, the agents, the world pipeline, and the advisor. Nothing
//! here has side effects.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers
//! - [`enums`] -- Resource kinds, inventory items, crafting recipes
//! - [`structs`] -- Positions, inventories, status/signal maps, turn results, snapshots
//! - [`actions`] -- Agent intents and the events that carry them

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, BehaviorEvent};
pub use enums::{Item, Recipe, ResourceKind};
pub use ids::AgentId;
pub use structs::{
    AdvisorAction, AgentSnapshot, Inventory, Metrics, Position, ResourceStatus, Signals,
    TurnResult, WorldDims, WorldSnapshot,
};
