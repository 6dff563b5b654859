//! Error types for the `microworld-world` crate.
//!
//! Only construction and setup can fail. Settlement against the grid never
//! surfaces an error for a missing resource; it simply does nothing.

use microworld_types::Position;

/// Errors that can occur while building or editing the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid side length must be at least one cell.
    #[error("invalid world size {size}: must be greater than zero")]
    InvalidSize {
        /// The rejected size.
        size: u32,
    },

    /// A position lies outside the grid.
    #[error("position {position} is outside a {size}x{size} grid")]
    PositionOutOfBounds {
        /// The rejected position.
        position: Position,
        /// The grid side length.
        size: u32,
    },

    /// A configuration value is out of range.
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
