//! Application configuration: YAML file, then environment overrides.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_STORE_BACKEND: &str = "CONSIST_STORE";
pub const ENV_DATA_DIR: &str = "CONSIST_DATA_DIR";
pub const ENV_LOG: &str = "CONSIST_LOG";

/// Upper bound front ends apply to clone requests.
pub const DEFAULT_CLONE_QUANTITY_MAX: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            data_dir: PathBuf::from(".consist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub clone_quantity_max: u32,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            clone_quantity_max: DEFAULT_CLONE_QUANTITY_MAX,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by `path` if given, overlaid by the environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                Self::from_yaml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(backend) = lookup(ENV_STORE_BACKEND) {
            self.store.backend = match backend.trim().to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "file" => StoreBackend::File,
                other => {
                    return Err(AppError::Config(format!(
                        "{ENV_STORE_BACKEND} must be 'memory' or 'file', got '{other}'"
                    )));
                }
            };
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.store.data_dir = PathBuf::from(dir);
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.clone_quantity_max == 0 {
            return Err(AppError::Config(
                "clone_quantity_max must be at least 1".to_string(),
            ));
        }
        if self.store.backend == StoreBackend::File && self.store.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config(
                "store.data_dir must be set for the file backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested clone quantity into `1..=clone_quantity_max`.
    pub fn clamp_clone_quantity(&self, requested: u32) -> u32 {
        requested.clamp(1, self.clone_quantity_max.max(1))
    }
}
