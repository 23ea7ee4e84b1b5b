//! Reasoner configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::ConfigError;

/// Configuration of the whole reasoning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonerConfig {
    /// Confidence below which the evaluator asks for a revision.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Knowledge store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration of the knowledge store and its resolution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Confidence below which `revise_reasoning` looks for related clauses.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Maximum number of rule expansions along one derivation branch.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of solutions collected for a single query.
    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,
}

/// Largest accepted `store.max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 10_000;

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_max_depth() -> usize {
    64
}

fn default_max_solutions() -> usize {
    1024
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            max_depth: default_max_depth(),
            max_solutions: default_max_solutions(),
        }
    }
}

impl ReasonerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ReasonerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading reasoner config");
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("confidence_threshold", self.confidence_threshold)?;
        self.store.validate()
    }
}

impl StoreConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("store.confidence_threshold", self.confidence_threshold)?;
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "store.max_depth must be within [1, {MAX_DEPTH_LIMIT}], got {}",
                self.max_depth
            )));
        }
        if self.max_solutions == 0 {
            return Err(ConfigError::Invalid("store.max_solutions must be > 0".into()));
        }
        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReasonerConfig::default();
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.store.confidence_threshold, 0.7);
        assert_eq!(config.store.max_depth, 64);
        assert_eq!(config.store.max_solutions, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ReasonerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReasonerConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = ReasonerConfig::from_toml_str(
            r#"
            confidence_threshold = 0.5

            [store]
            max_depth = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.store.max_depth, 8);
        assert_eq!(config.store.confidence_threshold, 0.7);
        assert_eq!(config.store.max_solutions, 1024);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ReasonerConfig::from_toml_str("confidence_threshold = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReasonerConfig::from_toml_str("[store]\nmax_depth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReasonerConfig::from_toml_str("confidence_threshold = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_max_depth_upper_bound() {
        assert!(matches!(
            ReasonerConfig::from_toml_str("[store]\nmax_depth = 1000000"),
            Err(ConfigError::Invalid(_))
        ));

        let config =
            ReasonerConfig::from_toml_str(&format!("[store]\nmax_depth = {MAX_DEPTH_LIMIT}"))
                .unwrap();
        assert_eq!(config.store.max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ReasonerConfig::load("/nonexistent/syllogos/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
