//! Error types for the advisor.
//!
//! Uses `thiserror` for typed errors along the planning pipeline: signal
//! acquisition, provider calls, the deadline bridge, prompt rendering, and
//! plan parsing. None of these ever escape [`Advisor::adjust`]; they are
//! logged and replaced by safe defaults.
//!
//! [`Advisor::adjust`]: crate::advisor::Advisor::adjust

/// A text-generation provider failed.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The transport to the provider failed.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider is not reachable or refused the request.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// A planner could not produce a plan.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The provider returned an error.
    #[error("provider error: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: ProviderError,
    },

    /// The provider did not answer before the deadline.
    #[error("timeout: provider call exceeded {timeout_ms}ms deadline")]
    DeadlineExceeded {
        /// The deadline in milliseconds.
        timeout_ms: u128,
    },

    /// The background task ended without a result (it panicked or was cancelled).
    #[error("provider task ended without a result")]
    TaskFailed,

    /// The async runtime backing the bridge could not be created.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// A prompt template failed to load or render.
    #[error("template render error: {0}")]
    Prompt(String),

    /// The response text could not be parsed into a plan.
    #[error("plan parse error: {0}")]
    Parse(String),

    /// The response parsed as JSON but was not an object.
    #[error("plan is not a JSON object: {0}")]
    NotAnObject(String),
}

/// The world could not report its resource status.
#[derive(Debug, thiserror::Error)]
#[error("signal source error: {message}")]
pub struct SignalError {
    /// Description of the failure.
    pub message: String,
}

impl SignalError {
    /// Create a signal error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
