//! Worker configuration, loaded from TOML.
//!
//! ```toml
//! queue_capacity = 256
//!
//! [options]
//! radius = 60.0
//! maxZoom = 16
//! minPoints = 2
//! ```

use anyhow::Context;
use geocluster::ClusterOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Requests buffered before senders wait
    #[serde(default = "WorkerConfig::default_queue_capacity")]
    pub queue_capacity: usize,

    /// Defaults for options an `INIT` leaves out
    #[serde(default)]
    pub options: ClusterOptions,
}

impl WorkerConfig {
    const fn default_queue_capacity() -> usize {
        256
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be at least 1".to_string());
        }
        self.options.validate()
    }

    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let config: WorkerConfig = toml::from_str(toml_str)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_queue_capacity(),
            options: ClusterOptions::default(),
        }
    }
}
