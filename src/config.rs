//! Runtime configuration: where the compiled datasets live and where to bind.
//!
//! Defaults work out of the box; an optional YAML file named by `CAGEMAP_CONFIG`
//! can replace any subset of fields, and `CAGEMAP_BIND` / `CAGEMAP_DATA_DIR`
//! override last.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CagemapError, Result};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DATA_DIR: &str = "static_data";
pub const DEFAULT_INDUSTRIAL_FILE: &str = "locations.csv";
pub const DEFAULT_RESEARCH_FILE: &str = "aphis_data_final.csv";
pub const DEFAULT_LICENSE_FILE: &str = "inspection_reports.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub industrial_file: String,
    pub research_file: String,
    pub license_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            industrial_file: DEFAULT_INDUSTRIAL_FILE.to_string(),
            research_file: DEFAULT_RESEARCH_FILE.to_string(),
            license_file: DEFAULT_LICENSE_FILE.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `CAGEMAP_CONFIG` (if set), then env overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = match std::env::var("CAGEMAP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!("loading config from {path}");
                Self::from_yaml_file(path)?
            }
            _ => Self::default(),
        };

        if let Ok(bind) = std::env::var("CAGEMAP_BIND") {
            tracing::debug!("override bind_addr from env: {bind}");
            config.bind_addr = bind;
        }
        if let Ok(dir) = std::env::var("CAGEMAP_DATA_DIR") {
            tracing::debug!("override data_dir from env: {dir}");
            config.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn industrial_path(&self) -> PathBuf {
        self.data_dir.join(&self.industrial_file)
    }

    pub fn research_path(&self) -> PathBuf {
        self.data_dir.join(&self.research_file)
    }

    pub fn license_path(&self) -> PathBuf {
        self.data_dir.join(&self.license_file)
    }

    fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(CagemapError::Config {
                field: "bind_addr".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        for (field, value) in [
            ("industrial_file", &self.industrial_file),
            ("research_file", &self.research_file),
            ("license_file", &self.license_file),
        ] {
            if value.trim().is_empty() {
                return Err(CagemapError::Config {
                    field: field.to_string(),
                    reason: "must name a file".to_string(),
                });
            }
        }
        Ok(())
    }
}
