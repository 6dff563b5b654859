//! Resource grid, regeneration, and the read-only world view for the
//! Microworld simulation.
//!
//! This crate models the physical layer: a square grid of wood/flint/food
//! counts seeded from a deterministic generator, the forage and regeneration
//! rules that mutate it, and the [`WorldView`] capability through which
//! agents observe the world without touching it.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction and setup.
//! - [`grid`] -- [`ResourceGrid`]: storage, seeded generation, windows, totals.
//! - [`resource`] -- Forage harvesting, regeneration, and scarcity indicators.
//! - [`view`] -- The [`WorldView`] trait.

pub mod error;
pub mod grid;
pub mod resource;
pub mod view;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{CellStock, ResourceGrid, stock_sum};
pub use resource::{
    RegenProbabilities, effective_probability, harvest_richest, regenerate, scarcity,
    scarcity_signals,
};
pub use view::WorldView;
