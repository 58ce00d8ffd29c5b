//! Search configuration.
//!
//! All tunables live in [`SearchConfig`], which serializes to and from JSON
//! so a run can be reproduced from a config file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::strategy::move_ordering::OrderingWeights;
use crate::{Error, Result};

/// How an evaluation is added to the nodes on the backpropagation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backpropagation {
    /// Sign alternates per ply so each node scores its incoming move from the
    /// point of view of the player who made it.
    #[default]
    Negamax,
    /// The same scalar is added unchanged at every level.
    Absolute,
}

/// MCTS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Exploration constant `C` of the selection score.
    /// Default: 1.0
    pub exploration_constant: f64,

    /// Added to the child visit count in the exploitation term.
    /// Default: 1e-7
    pub epsilon: f64,

    /// Maximum number of cached oracle values. Sizes the cache built by
    /// `Mcts::with_config_cache`; a caller-supplied cache keeps its own capacity.
    /// Default: 1_000_000
    pub cache_capacity: usize,

    /// Number of most-visited root children the exploratory policy draws from.
    /// Default: 3
    pub exploratory_top_k: usize,

    pub backpropagation: Backpropagation,

    pub ordering: OrderingWeights,

    /// Seed for the exploratory policy. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 1.0,
            epsilon: 1e-7,
            cache_capacity: 1_000_000,
            exploratory_top_k: 3,
            backpropagation: Backpropagation::Negamax,
            ordering: OrderingWeights::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        log::debug!(
            "Loaded search config from {}: {}",
            path.as_ref().display(),
            config.to_config_string()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(Error::Config(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::Config(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache_capacity must be at least 1".to_string()));
        }
        if self.exploratory_top_k == 0 {
            return Err(Error::Config(
                "exploratory_top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Compact one-line summary for logs.
    pub fn to_config_string(&self) -> String {
        format!(
            "c[{:.2}]_eps[{:e}]_cache[{}]_topk[{}]_backprop[{:?}]_order[{},{},{},{},{}]",
            self.exploration_constant,
            self.epsilon,
            self.cache_capacity,
            self.exploratory_top_k,
            self.backpropagation,
            self.ordering.capture_multiplier,
            self.ordering.check_bonus,
            self.ordering.checkmate_bonus,
            self.ordering.castling_bonus,
            self.ordering.center_bonus,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.exploration_constant, 1.0);
        assert_eq!(config.epsilon, 1e-7);
        assert_eq!(config.cache_capacity, 1_000_000);
        assert_eq!(config.exploratory_top_k, 3);
        assert_eq!(config.backpropagation, Backpropagation::Negamax);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SearchConfig::default();
        config.cache_capacity = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = SearchConfig::default();
        config.exploration_constant = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.epsilon = 0.0;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.exploratory_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"exploration_constant": 1.5, "backpropagation": "absolute", "ordering": {{"check_bonus": 70}}}}"#
        )
        .unwrap();

        let config = SearchConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.exploration_constant, 1.5);
        assert_eq!(config.backpropagation, Backpropagation::Absolute);
        assert_eq!(config.ordering.check_bonus, 70);
        assert_eq!(config.ordering.capture_multiplier, 10);
        assert_eq!(config.cache_capacity, 1_000_000);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cache_capacity": 0}}"#).unwrap();
        assert!(matches!(
            SearchConfig::from_json_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_string() {
        let config = SearchConfig::default();
        let summary = config.to_config_string();
        assert!(summary.contains("c[1.00]"));
        assert!(summary.contains("backprop[Negamax]"));
        assert!(summary.contains("order[10,50,1000000,30,5]"));
    }
}
