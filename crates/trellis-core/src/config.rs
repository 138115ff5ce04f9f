//! Augmentation run configuration.
//!
//! Stored as JSON (`trellis.json` by default). Every field has a default,
//! so a file only needs to mention the options it changes.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default file name written by `trellis init`.
pub const DEFAULT_CONFIG_FILE: &str = "trellis.json";

/// Limits and thresholds for one augmentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Maximum artificial edges incident to any single node.
    pub per_node_edge_limit: usize,

    /// Ceiling on the total edge count, pre-existing edges included.
    pub global_edge_target: usize,

    /// Minimum common-neighbor count for a phase 1 candidate.
    pub triangle_score_threshold: usize,

    /// Radius of the neighborhood used for phase 2 scoring.
    pub local_betweenness_hops: usize,

    /// Optional wall-clock limit for the whole run, in seconds.
    pub time_limit_secs: Option<u64>,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            per_node_edge_limit: 10,
            global_edge_target: 1_000_000,
            triangle_score_threshold: 2,
            local_betweenness_hops: 4,
            time_limit_secs: None,
        }
    }
}

impl AugmentConfig {
    /// Loads a configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_limit_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "time_limit_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}
