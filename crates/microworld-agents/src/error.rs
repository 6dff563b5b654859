//! Error types for the microworld-agents crate.
//!
//! Inventory operations return typed errors rather than panicking. Settlement
//! treats every one of these as a silent no-op; they exist so that crafting
//! and trading can be checked before anything is committed.

use microworld_types::Item;

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to remove more of an item than the agent holds.
    #[error("insufficient item: wanted {requested} of {item} but only have {available}")]
    InsufficientItem {
        /// The item being removed.
        item: Item,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity the agent actually holds.
        available: u32,
    },

    /// An arithmetic overflow occurred while updating a count.
    #[error("arithmetic overflow in inventory update: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
