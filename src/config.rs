// src/config.rs

use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, `RUST_LOG` takes precedence
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub pretty: bool,
    /// Print a per-track summary instead of every note and event
    pub summary_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            pretty: true,
            summary_only: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn summary_config() -> Self {
        let mut config = AppConfig::default();
        config.output.summary_only = true;
        config
    }

    pub fn quiet_config() -> Self {
        let mut config = AppConfig::default();
        config.logging.filter = "warn".to_string();
        config.output.pretty = false;
        config
    }
}
