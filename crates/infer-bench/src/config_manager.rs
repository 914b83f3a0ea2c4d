use crate::bench_config::BenchConfig;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::Path;

pub const LOCAL_VENUE_ENV: &str = "INFER_BENCH_LOCAL_VENUE";
pub const REMOTE_VENUE_ENV: &str = "INFER_BENCH_REMOTE_VENUE";
pub const DEFAULT_NUM_CLASSES_ENV: &str = "INFER_BENCH_DEFAULT_NUM_CLASSES";

/// Layers environment overrides on top of a [`BenchConfig`]
pub struct ConfigManager {
    config: BenchConfig,
    env_vars: HashMap<String, String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a config string
    pub fn from_string(config_str: String) -> Result<Self> {
        let config = BenchConfig::from_string(config_str).context("Failed to parse bench config")?;
        Self::from_config(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = BenchConfig::from_path(path)
            .with_context(|| format!("Failed to load bench config from {}", path.display()))?;
        Self::from_config(config)
    }

    pub fn from_config(config: BenchConfig) -> Result<Self> {
        let mut manager = Self {
            config,
            env_vars: HashMap::new(),
        };
        manager.load_environment_variables()?;
        manager.apply_overrides()?;
        Ok(manager)
    }

    /// Get a reference to the effective configuration
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn into_config(self) -> BenchConfig {
        self.config
    }

    fn load_environment_variables(&mut self) -> Result<()> {
        for (key, value) in env::vars() {
            self.env_vars.insert(key, value);
        }

        // Env file values win over the process environment
        if let Some(env_file) = &self.config.env_file {
            let entries = dotenvy::from_path_iter(env_file)
                .with_context(|| format!("Failed to open env file at {:?}", env_file))?;
            for entry in entries {
                let (key, value) = entry.context("Failed to parse env file entry")?;
                self.env_vars.insert(key, value);
            }
        }

        Ok(())
    }

    fn apply_overrides(&mut self) -> Result<()> {
        if let Some(venue) = self.env_vars.get(LOCAL_VENUE_ENV) {
            self.config.local_venue = venue.clone();
        }
        if let Some(venue) = self.env_vars.get(REMOTE_VENUE_ENV) {
            self.config.remote_venue = venue.clone();
        }
        if let Some(classes) = self.env_vars.get(DEFAULT_NUM_CLASSES_ENV) {
            self.config.default_num_classes = classes
                .trim()
                .parse()
                .with_context(|| {
                    format!("{} must be an integer, got '{}'", DEFAULT_NUM_CLASSES_ENV, classes)
                })?;
        }
        self.config
            .validate()
            .context("Invalid configuration after environment overrides")?;
        Ok(())
    }

    /// Get specific environment variable
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env_vars.get(key)
    }
}
