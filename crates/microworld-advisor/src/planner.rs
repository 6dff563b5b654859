//! Planning strategies consulted by the advisor.
//!
//! A [`Planner`] maps a signal set to a [`Plan`] synchronously. Two ship:
//!
//! - [`NullPlanner`] always returns the baseline plan. It is the
//!   zero-configuration default and never touches the network.
//! - [`LlmPlanner`] renders the signals into a prompt, asks a [`Provider`]
//!   through the deadline-bound bridge, and parses the reply. Every failure
//!   along the way is logged and replaced by the baseline plan.

use std::sync::Arc;

use microworld_types::Signals;
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tracing::{debug, warn};

use crate::bridge::run_with_deadline;
use crate::error::PlannerError;
use crate::parse::{Plan, parse_plan};
use crate::prompt::PromptBuilder;
use crate::provider::{Provider, ProviderConfig};

/// A strategy that proposes a plan from the current signals.
pub trait Planner: Send {
    /// Produce a plan for the next turn.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] when no plan can be produced. The advisor
    /// replaces failures with the baseline plan.
    fn plan(&self, signals: &Signals) -> Result<Plan, PlannerError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Always proposes the baseline plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlanner;

impl Planner for NullPlanner {
    fn plan(&self, _signals: &Signals) -> Result<Plan, PlannerError> {
        Ok(Plan::baseline())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Where provider futures run.
enum RuntimeHost {
    /// A private runtime owned by the planner.
    Owned(Option<Runtime>),
    /// A runtime owned by someone else.
    Shared(Handle),
}

impl RuntimeHost {
    fn handle(&self) -> Result<&Handle, PlannerError> {
        match self {
            Self::Owned(Some(rt)) => Ok(rt.handle()),
            Self::Owned(None) => Err(PlannerError::Runtime(String::from(
                "planner runtime already shut down",
            ))),
            Self::Shared(handle) => {
                // A shared runtime may be the one driving this thread.
                if let Ok(current) = Handle::try_current()
                    && current.runtime_flavor() == RuntimeFlavor::CurrentThread
                {
                    return Err(PlannerError::Runtime(String::from(
                        "cannot block on a shared runtime from a current-thread runtime",
                    )));
                }
                Ok(handle)
            }
        }
    }
}

impl Drop for RuntimeHost {
    fn drop(&mut self) {
        // Dropping a runtime from async context panics; background shutdown does not.
        if let Self::Owned(slot) = self
            && let Some(rt) = slot.take()
        {
            rt.shutdown_background();
        }
    }
}

/// A planner backed by an external text-generation provider.
pub struct LlmPlanner {
    provider: Arc<dyn Provider>,
    cfg: ProviderConfig,
    prompts: PromptBuilder,
    host: RuntimeHost,
}

impl LlmPlanner {
    /// Planner with its own single-worker runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Runtime`] if the runtime cannot be built, or
    /// [`PlannerError::Prompt`] if the built-in templates fail to compile.
    pub fn new(provider: Arc<dyn Provider>, cfg: ProviderConfig) -> Result<Self, PlannerError> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("llm-planner")
            .enable_all()
            .build()
            .map_err(|e| PlannerError::Runtime(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            provider,
            cfg,
            prompts: PromptBuilder::new()?,
            host: RuntimeHost::Owned(Some(rt)),
        })
    }

    /// Planner that runs provider calls on an existing runtime.
    ///
    /// [`plan`](Planner::plan) must then be called from outside that
    /// runtime's async context, for example from `spawn_blocking`. Calls
    /// made from inside a current-thread runtime are rejected with
    /// [`PlannerError::Runtime`].
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Prompt`] if the built-in templates fail to compile.
    pub fn on_handle(
        provider: Arc<dyn Provider>,
        cfg: ProviderConfig,
        handle: Handle,
    ) -> Result<Self, PlannerError> {
        Ok(Self {
            provider,
            cfg,
            prompts: PromptBuilder::new()?,
            host: RuntimeHost::Shared(handle),
        })
    }

    /// Provider settings in use.
    pub const fn config(&self) -> &ProviderConfig {
        &self.cfg
    }

    /// One attempt: render, generate under the deadline, parse.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any stage.
    pub fn try_plan(&self, signals: &Signals) -> Result<Plan, PlannerError> {
        let messages = self.prompts.render(signals)?;
        let provider = Arc::clone(&self.provider);
        let cfg = self.cfg.clone();

        let raw = run_with_deadline(self.host.handle()?, self.cfg.timeout, async move {
            provider.generate(&messages, &cfg).await
        })??;

        debug!(
            provider = self.provider.name(),
            response_len = raw.len(),
            "provider responded"
        );
        parse_plan(&raw)
    }
}

impl Planner for LlmPlanner {
    /// Never fails: any error yields the baseline plan.
    fn plan(&self, signals: &Signals) -> Result<Plan, PlannerError> {
        match self.try_plan(signals) {
            Ok(plan) => Ok(plan),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    model = %self.cfg.model,
                    error = %e,
                    "planner fallback: using baseline plan"
                );
                Ok(Plan::baseline())
            }
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}
