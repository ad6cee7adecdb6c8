//! CLI configuration management

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Ideas data file override
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let config: CliConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "abhub", "abhub-cli")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Enable verbose output by default
    #[serde(default)]
    pub verbose: bool,

    /// Average order value assumed by cost projections
    #[serde(default = "default_aov")]
    pub default_aov: f64,

    /// Delay window in days for cost projections
    #[serde(default = "default_delay_days")]
    pub default_delay_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: true,
            verbose: false,
            default_aov: default_aov(),
            default_delay_days: default_delay_days(),
        }
    }
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

fn default_aov() -> f64 {
    abhub_metrics::calculators::DEFAULT_AVG_ORDER_VALUE
}

fn default_delay_days() -> u32 {
    abhub_metrics::calculators::DEFAULT_DELAY_DAYS
}
