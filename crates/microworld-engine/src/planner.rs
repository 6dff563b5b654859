//! Planner selection from configuration.

use std::sync::Arc;

use microworld_advisor::{LlmPlanner, NullPlanner, Planner, Provider, provider_from_name};
use microworld_core::config::{AdvisorConfig, PlannerKind};
use tokio::runtime::Handle;
use tracing::info;

use crate::error::EngineError;

/// Build the configured planner.
///
/// `llm` planners run provider calls on `handle`; the run loop must then
/// call them from a blocking thread.
pub fn build_planner(
    config: &AdvisorConfig,
    handle: Handle,
) -> Result<Box<dyn Planner>, EngineError> {
    match config.planner {
        PlannerKind::Null => {
            info!("using null planner");
            Ok(Box::new(NullPlanner))
        }
        PlannerKind::Llm => {
            let provider: Arc<dyn Provider> = Arc::from(provider_from_name(&config.provider)?);
            info!(
                provider = provider.name(),
                model = %config.model,
                timeout_ms = config.timeout_ms,
                "using llm planner"
            );
            let planner = LlmPlanner::on_handle(provider, config.provider_config(), handle)?;
            Ok(Box::new(planner))
        }
    }
}
