//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during engine startup and the
//! hand-off to the blocking run loop.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: microworld_core::ConfigError,
    },

    /// World construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: microworld_world::WorldError,
    },

    /// The configured provider does not exist.
    #[error("provider error: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: microworld_advisor::ProviderError,
    },

    /// The planner could not be built.
    #[error("planner error: {source}")]
    Planner {
        /// The underlying planner error.
        #[from]
        source: microworld_advisor::PlannerError,
    },

    /// The blocking run-loop task did not complete.
    #[error("run loop task failed: {message}")]
    Task {
        /// Description of the failure.
        message: String,
    },
}
