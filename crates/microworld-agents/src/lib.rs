//! Agent state, inventory operations, and the decision policy for the
//! Microworld simulation.
//!
//! This crate contains the logic layer for agents -- everything that operates
//! on agent state without owning shared world state. Decisions are made
//! through the read-only [`WorldView`](microworld_world::WorldView); the
//! world crate's pipeline applies the results.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] record and its perceive/decide/act cycle
//! - [`error`] -- Error types for inventory operations ([`AgentError`])
//! - [`inventory`] -- Checked item arithmetic, atomic crafting and swaps
//! - [`policy`] -- The ordered rule list and [`DecisionContext`]

pub mod agent;
pub mod error;
pub mod inventory;
pub mod policy;

// Re-export primary types at crate root for convenience.
pub use agent::Agent;
pub use error::AgentError;
pub use policy::{DecisionContext, TRADE_RADIUS, decide};
