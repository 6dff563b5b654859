//! World pipeline, settlement, configuration, and the run loop for the
//! Microworld simulation.
//!
//! This crate owns the shared state (the resource grid and the agent
//! registry) and the turn pipeline that mutates it: perceive, decide, act,
//! settle for each agent in registration order, then advisor, regeneration,
//! and metrics.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `microworld-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- [`RunControl`] stop flag and run boundaries.
//! - [`runner`] -- [`run_simulation`], the bounded turn loop.
//! - [`settlement`] -- Applying one event to the grid and inventories.
//! - [`view`] -- [`AgentView`], the per-agent read-only world view.
//! - [`world`] -- [`World`]: construction, setup, the turn pipeline, status,
//!   and snapshots.

pub mod config;
pub mod control;
pub mod runner;
pub mod settlement;
pub mod view;
pub mod world;

pub use config::{ConfigError, SimulationConfig};
pub use control::{RunControl, SimulationEndReason};
pub use runner::{NoOpCallback, SimulationResult, TurnCallback, run_simulation};
pub use view::AgentView;
pub use world::World;
