//! Configuration for lattice construction and context extraction.
//!
//! Every section has defaults, so a config file only needs the fields it
//! changes:
//!
//! ```json
//! {"lattice": {"support_threshold": 2.0, "confidence_threshold": 0.05}}
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lattice: LatticeConfig,
    pub context: ContextConfig,
    pub features: FeatureConfig,
}

/// Thresholds of the concept lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Minimum occurrence count for a context to count as present
    pub support_threshold: f64,
    /// Confidence a merge may lose relative to either merged concept
    pub confidence_threshold: f64,
}

/// Surrounding-character context extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Context widths in characters
    pub char_counts: Vec<usize>,
    /// Extract `L(..)` contexts
    pub left: bool,
    /// Extract `R(..)` contexts
    pub right: bool,
    /// Drop contexts shorter than the requested width
    pub exact_count: bool,
}

/// Word encoding for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Longest `L(..)`/`R(..)` substring considered around a position
    pub max_context_len: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            support_threshold: 1.0,
            confidence_threshold: 0.0,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            char_counts: vec![1, 2],
            left: true,
            right: true,
            exact_count: true,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { max_context_len: 3 }
    }
}

impl Config {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse from a JSON string; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Persist to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.lattice.support_threshold, 1.0);
        assert_eq!(config.context.char_counts, vec![1, 2]);
        assert_eq!(config.features.max_context_len, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            Config::from_json(r#"{"lattice": {"confidence_threshold": 0.25}}"#).unwrap();
        assert_eq!(config.lattice.confidence_threshold, 0.25);
        assert_eq!(config.lattice.support_threshold, 1.0);
        assert!(config.context.left && config.context.right);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json("{lattice").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let mut config = Config::default();
        config.context.char_counts = vec![1, 2, 3];
        config.context.exact_count = false;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
