//! Configuration loading and typed config structures for the Microworld
//! simulation.
//!
//! The configuration lives in `microworld-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads and validates the file. Every field has a default, so
//! an empty document is a valid configuration.

use std::path::Path;
use std::time::Duration;

use microworld_advisor::ProviderConfig;
use microworld_world::RegenProbabilities;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `microworld-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid size, seed, and population.
    #[serde(default)]
    pub world: WorldConfig,

    /// Resource generation and regeneration.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Planner and provider selection.
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.size == 0 {
            return Err(ConfigError::Invalid(String::from(
                "world.size must be greater than zero",
            )));
        }
        self.economy.validate()?;
        if !self.advisor.temperature.is_finite() || self.advisor.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "advisor.temperature must be a non-negative number, got {}",
                self.advisor.temperature
            )));
        }
        if self.advisor.timeout_ms == 0 {
            return Err(ConfigError::Invalid(String::from(
                "advisor.timeout_ms must be greater than zero",
            )));
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Random seed for the grid, agent placement, and regeneration.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Agents created at construction.
    #[serde(default = "default_num_agents")]
    pub num_agents: u32,

    /// Chebyshev radius an agent can see.
    #[serde(default = "default_vision_radius")]
    pub vision_radius: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            seed: default_seed(),
            num_agents: default_num_agents(),
            vision_radius: default_vision_radius(),
        }
    }
}

/// Economy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EconomyConfig {
    /// Initial per-kind cell count is uniform in `0..=initial_max_per_kind`.
    #[serde(default = "default_initial_max_per_kind")]
    pub initial_max_per_kind: u32,

    /// Base regeneration probability per kind.
    #[serde(default)]
    pub regen_probability: RegenProbabilities,

    /// Units per cell at which scarcity reaches zero.
    #[serde(default = "default_scarcity_reference")]
    pub scarcity_reference: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_max_per_kind: default_initial_max_per_kind(),
            regen_probability: RegenProbabilities::default(),
            scarcity_reference: default_scarcity_reference(),
        }
    }
}

impl EconomyConfig {
    /// Check probabilities and the scarcity reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.regen_probability
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !self.scarcity_reference.is_finite() || self.scarcity_reference < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "economy.scarcity_reference must be a non-negative number, got {}",
                self.scarcity_reference
            )));
        }
        Ok(())
    }
}

/// Which planner drives the advisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannerKind {
    /// Deterministic baseline, no I/O.
    #[default]
    Null,
    /// External text-generation provider.
    Llm,
}

/// Advisor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdvisorConfig {
    /// Planner selection.
    #[serde(default)]
    pub planner: PlannerKind,

    /// Provider name, used when `planner` is `llm`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-call provider deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            planner: PlannerKind::default(),
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AdvisorConfig {
    /// Provider settings derived from this section.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many turns (0 = unlimited).
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// Pause between turns in milliseconds.
    #[serde(default)]
    pub turn_interval_ms: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_real_time_seconds: 0,
            turn_interval_ms: 0,
        }
    }
}

const fn default_size() -> u32 {
    16
}

const fn default_seed() -> u64 {
    42
}

const fn default_num_agents() -> u32 {
    8
}

const fn default_vision_radius() -> u32 {
    2
}

const fn default_initial_max_per_kind() -> u32 {
    3
}

const fn default_scarcity_reference() -> f64 {
    1.5
}

fn default_provider() -> String {
    String::from("null")
}

fn default_model() -> String {
    String::from("null-model")
}

const fn default_temperature() -> f64 {
    0.2
}

const fn default_timeout_ms() -> u64 {
    2000
}

const fn default_max_turns() -> u64 {
    100
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.size, 16);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.economy.regen_probability.food, 0.05);
        assert_eq!(config.advisor.planner, PlannerKind::Null);
        assert_eq!(config.simulation.max_turns, 100);
    }

    #[test]
    fn parses_partial_document() {
        let yaml = r"
world:
  size: 4
  seed: 7
economy:
  regen_probability:
    food: 0.5
  scarcity_reference: 2.0
advisor:
  planner: llm
  timeout_ms: 250
simulation:
  max_turns: 0
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.size, 4);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.num_agents, 8);
        assert_eq!(config.economy.regen_probability.food, 0.5);
        assert_eq!(config.economy.regen_probability.wood, 0.05);
        assert_eq!(config.advisor.planner, PlannerKind::Llm);
        assert_eq!(
            config.advisor.provider_config().timeout,
            Duration::from_millis(250)
        );
        assert_eq!(config.simulation.max_turns, 0);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let yaml = include_str!("../../../microworld-config.yaml");
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn rejects_zero_size() {
        let result = SimulationConfig::parse("world:\n  size: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_probability_above_one() {
        let result = SimulationConfig::parse("economy:\n  regen_probability:\n    wood: 1.5\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_negative_scarcity_reference() {
        let result = SimulationConfig::parse("economy:\n  scarcity_reference: -1.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_negative_seed() {
        let result = SimulationConfig::parse("world:\n  seed: -3\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn rejects_unknown_planner() {
        let result = SimulationConfig::parse("advisor:\n  planner: oracle\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/microworld.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
