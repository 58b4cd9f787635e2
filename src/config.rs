use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::reconcile::ClassifierPolicy;

/// Settings for one reconciliation run.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Proximity fallback radius in meters; 0 disables it
    pub radius_meters: f64,
    pub policy: ClassifierPolicy,
    /// Let unnamed points match each other by identifier
    pub match_unnamed_by_id: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            radius_meters: 0.0,
            policy: ClassifierPolicy::default(),
            match_unnamed_by_id: true,
        }
    }
}

impl ReconcileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ReconcileConfig =
            toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}
