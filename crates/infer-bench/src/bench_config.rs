use crate::errors::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

fn default_local_venue() -> String {
    "Browser".to_string()
}

fn default_remote_venue() -> String {
    "Server".to_string()
}

fn default_num_classes() -> usize {
    10
}

fn default_model_classes() -> HashMap<String, usize> {
    HashMap::from([("distilbert".to_string(), 4)])
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BenchConfig {
    /// Venue treated as "browser-like" by the comparator
    #[serde(default = "default_local_venue")]
    pub local_venue: String,
    /// Venue treated as "server-like"; its runs also report round-trip time
    #[serde(default = "default_remote_venue")]
    pub remote_venue: String,
    #[serde(default = "default_num_classes")]
    pub default_num_classes: usize,
    /// Class counts keyed by model name
    #[serde(default = "default_model_classes")]
    pub model_classes: HashMap<String, usize>,
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            local_venue: default_local_venue(),
            remote_venue: default_remote_venue(),
            default_num_classes: default_num_classes(),
            model_classes: default_model_classes(),
            env_file: None,
        }
    }
}

impl BenchConfig {
    pub fn from_string(cfg: String) -> BenchResult<Self> {
        let config: BenchConfig = serde_json::from_str(&cfg)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> BenchResult<Self> {
        Self::from_string(read_to_string(path)?)
    }

    pub fn to_string(&self) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.local_venue.is_empty() || self.remote_venue.is_empty() {
            return Err(BenchError::ConfigError("venue names must not be empty".to_string()));
        }
        if self.local_venue == self.remote_venue {
            return Err(BenchError::ConfigError(format!(
                "local and remote venue are both '{}'",
                self.local_venue
            )));
        }
        if self.default_num_classes == 0 {
            return Err(BenchError::ConfigError("default_num_classes must be positive".to_string()));
        }
        if let Some((model, _)) = self.model_classes.iter().find(|(_, n)| **n == 0) {
            return Err(BenchError::ConfigError(format!(
                "model '{}' has zero classes",
                model
            )));
        }
        Ok(())
    }

    /// Class count for `model`, falling back to the configured default.
    pub fn num_classes_for(&self, model: &str) -> usize {
        self.model_classes
            .get(model)
            .copied()
            .unwrap_or(self.default_num_classes)
    }
}
