//! The advisor layer of the Microworld simulation.
//!
//! Once per turn the [`Advisor`] observes the turn's events, reads resource
//! signals from the world through [`SignalSource`], and asks a [`Planner`]
//! for the next regeneration multiplier. Planners range from the offline
//! [`NullPlanner`] to the [`LlmPlanner`], which calls an async [`Provider`]
//! through a deadline-bound bridge so a slow or failing provider can never
//! stall a turn.
//!
//! # Modules
//!
//! - [`advisor`] -- [`Advisor`], [`AdvisorStats`], and the [`SignalSource`] seam
//! - [`bridge`] -- Blocking, deadline-bound execution of async work
//! - [`error`] -- [`ProviderError`], [`PlannerError`], [`SignalError`]
//! - [`parse`] -- Provider text to [`Plan`]
//! - [`planner`] -- The [`Planner`] trait and its two implementations
//! - [`prompt`] -- Prompt rendering with `minijinja`
//! - [`provider`] -- The [`Provider`] boundary and [`NullProvider`]

pub mod advisor;
pub mod bridge;
pub mod error;
pub mod parse;
pub mod planner;
pub mod prompt;
pub mod provider;

pub use advisor::{Advisor, AdvisorStats, SignalSource};
pub use error::{PlannerError, ProviderError, SignalError};
pub use parse::{Plan, parse_plan};
pub use planner::{LlmPlanner, NullPlanner, Planner};
pub use prompt::PromptBuilder;
pub use provider::{ChatMessage, NullProvider, Provider, ProviderConfig, Role, provider_from_name};
