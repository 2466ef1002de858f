//! Configuration for the reporting tool
//!
//! The simulation knobs here back explicitly placeholder business logic
//! (see metrics.rs); keeping them in config.toml rather than in code
//! makes the placeholders visible and swappable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants;

/// Configuration loaded from config.toml
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Simulated-metric knobs
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Assumed commission revenue per closed deal (USD)
    pub per_deal_revenue: f64,
    /// One closed deal per this many generated leads
    pub closure_rate_divisor: u32,
    /// Seed for the placeholder lead scorer
    pub lead_score_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            per_deal_revenue: constants::DEFAULT_PER_DEAL_REVENUE,
            closure_rate_divisor: constants::DEFAULT_CLOSURE_RATE_DIVISOR,
            lead_score_seed: constants::DEFAULT_LEAD_SCORE_SEED,
        }
    }
}

impl FileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (strings vs numbers)\n\n\
             See config.toml.example for the expected format."
        })
    }

    /// Load `path` if it exists; these are demo knobs, not credentials,
    /// so a missing file falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
