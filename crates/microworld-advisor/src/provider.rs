//! The text-generation provider boundary.
//!
//! A [`Provider`] turns a short chat transcript into raw text that is
//! expected to contain a JSON object. Providers are black boxes: they may be
//! slow, wrong, or unavailable, and the planner treats them accordingly.
//! Vendor transports live outside this crate; [`NullProvider`] is the
//! offline default.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the request.
    System,
    /// The request itself.
    User,
    /// A prior model reply.
    Assistant,
}

/// One message sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Per-call provider settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Provider name, for logging and selection.
    pub provider: String,
    /// Model identifier passed through to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Deadline for one `generate` call, enforced by the planner.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: String::from("null"),
            model: String::from("null-model"),
            temperature: 0.2,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A source of generated text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a reply to `messages`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider cannot answer.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        cfg: &ProviderConfig,
    ) -> Result<String, ProviderError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// A provider that always answers with the baseline plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

/// The reply [`NullProvider`] returns.
pub const NULL_REPLY: &str = r#"{"regen": 1.0}"#;

#[async_trait]
impl Provider for NullProvider {
    async fn generate(
        &self,
        _messages: &[ChatMessage],
        _cfg: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        Ok(String::from(NULL_REPLY))
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Build a provider by name.
///
/// # Errors
///
/// Returns [`ProviderError::Unavailable`] for names without a shipped
/// implementation.
pub fn provider_from_name(name: &str) -> Result<Box<dyn Provider>, ProviderError> {
    match name {
        "null" => Ok(Box::new(NullProvider)),
        other => Err(ProviderError::Unavailable(format!(
            "no provider named {other:?}"
        ))),
    }
}
