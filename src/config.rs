//! Center configuration.
//!
//! Everything has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! max_retained = 200
//!
//! [generator]
//! tick_interval_ms = 30000
//! arrival_probability = 0.1
//!
//! [[generator.catalog]]
//! title = "Library Notice"
//! message = "Reserved books are ready for pickup."
//! ```

use crate::error::{CenterError, Result};
use crate::feed::{default_catalog, MessageTemplate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default tick interval: 30 seconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30_000;

/// Default per-tick arrival probability.
pub const DEFAULT_ARRIVAL_PROBABILITY: f64 = 0.10;

/// Default per-subscriber event buffer.
pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 1000;

/// Simulated feed settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Run the feed when the center starts.
    pub enabled: bool,

    pub tick_interval_ms: u64,

    /// Chance of an arrival on each tick, within [0, 1].
    pub arrival_probability: f64,

    /// Fixed RNG seed for reproducible feeds (None = OS entropy).
    pub seed: Option<u64>,

    pub catalog: Vec<MessageTemplate>,
}

impl GeneratorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            arrival_probability: DEFAULT_ARRIVAL_PROBABILITY,
            seed: None,
            catalog: default_catalog(),
        }
    }
}

/// Notification center configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    pub generator: GeneratorConfig,

    /// Keep at most this many notifications, evicting the oldest.
    /// None means unbounded.
    pub max_retained: Option<usize>,

    /// Max buffered events per subscriber before it is dropped.
    pub subscription_buffer: usize,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            max_retained: None,
            subscription_buffer: DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }
}

impl CenterConfig {
    /// Default settings with the simulated feed switched off.
    pub fn without_generator() -> Self {
        let mut config = Self::default();
        config.generator.enabled = false;
        config
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: CenterConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subscription_buffer == 0 {
            return Err(CenterError::InvalidConfig(
                "subscription_buffer must be positive".to_string(),
            ));
        }
        if self.max_retained == Some(0) {
            return Err(CenterError::InvalidConfig(
                "max_retained must be positive when set".to_string(),
            ));
        }

        let generator = &self.generator;
        if !generator.enabled {
            return Ok(());
        }
        if generator.tick_interval_ms == 0 {
            return Err(CenterError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&generator.arrival_probability) {
            return Err(CenterError::InvalidConfig(format!(
                "arrival_probability {} outside [0, 1]",
                generator.arrival_probability
            )));
        }
        if generator.catalog.is_empty() {
            return Err(CenterError::InvalidConfig(
                "generator catalog is empty".to_string(),
            ));
        }
        if generator
            .catalog
            .iter()
            .any(|t| t.title.trim().is_empty() || t.message.trim().is_empty())
        {
            return Err(CenterError::InvalidConfig(
                "generator catalog has a blank title or message".to_string(),
            ));
        }

        Ok(())
    }
}
