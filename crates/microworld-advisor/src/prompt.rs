//! Prompt rendering via `minijinja`.
//!
//! The planner sends two messages: a system message fixing the reply format
//! and a user message carrying the current resource signals as JSON.
//! Templates are compiled once; custom ones can be supplied at construction.

use minijinja::{Environment, context};
use microworld_types::Signals;

use crate::error::PlannerError;
use crate::provider::{ChatMessage, Role};

const SYSTEM_TEMPLATE: &str = "You tune resource regeneration for a small grid world. \
Reply with one JSON object of the form {\"regen\": <non-negative number>} and optionally \
\"terrain\" and \"skills\" fields. A regen of 1.0 keeps the current rate.";

const USER_TEMPLATE: &str = "Resource signals after turn settlement:\n{{ signals_json }}\n\
{% if scarcity is not none %}Current scarcity: {{ scarcity }}\n{% endif %}\
Propose the regeneration multiplier for the next turn.";

/// Renders signal sets into chat messages.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    /// Builder with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Prompt`] if a template fails to compile.
    pub fn new() -> Result<Self, PlannerError> {
        let mut env = Environment::new();
        env.add_template("system", SYSTEM_TEMPLATE)
            .map_err(|e| PlannerError::Prompt(format!("failed to add system template: {e}")))?;
        env.add_template("user", USER_TEMPLATE)
            .map_err(|e| PlannerError::Prompt(format!("failed to add user template: {e}")))?;
        Ok(Self { env })
    }

    /// Builder with caller-supplied template sources.
    ///
    /// Both templates see `signals` (the mapping), `signals_json` (the
    /// mapping as a JSON string), and `scarcity` (or none).
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Prompt`] if a template fails to compile.
    pub fn with_templates(system: String, user: String) -> Result<Self, PlannerError> {
        let mut env = Environment::new();
        env.add_template_owned("system", system)
            .map_err(|e| PlannerError::Prompt(format!("failed to add system template: {e}")))?;
        env.add_template_owned("user", user)
            .map_err(|e| PlannerError::Prompt(format!("failed to add user template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the system and user messages for a signal set.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Prompt`] if serialization or rendering fails.
    pub fn render(&self, signals: &Signals) -> Result<Vec<ChatMessage>, PlannerError> {
        let signals_json = serde_json::to_string(signals)
            .map_err(|e| PlannerError::Prompt(format!("signals not serializable: {e}")))?;
        let ctx = context! {
            signals => signals,
            signals_json => signals_json,
            scarcity => signals.get("scarcity"),
        };

        let system = self
            .env
            .get_template("system")
            .map_err(|e| PlannerError::Prompt(format!("missing system template: {e}")))?
            .render(&ctx)
            .map_err(|e| PlannerError::Prompt(format!("system render failed: {e}")))?;
        let user = self
            .env
            .get_template("user")
            .map_err(|e| PlannerError::Prompt(format!("missing user template: {e}")))?
            .render(&ctx)
            .map_err(|e| PlannerError::Prompt(format!("user render failed: {e}")))?;

        Ok(vec![
            ChatMessage::new(Role::System, system),
            ChatMessage::new(Role::User, user),
        ])
    }
}
