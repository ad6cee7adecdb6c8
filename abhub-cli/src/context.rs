//! CLI execution context

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::output::{OutputFormat, OutputWriter};
use crate::store::IdeaStore;

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    /// Resolved ideas data file path
    pub data_file: PathBuf,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load().unwrap_or_default();

        // CLI flag wins, then the config file, then the default.
        let output_format = cli
            .output
            .or_else(|| OutputFormat::from_str(&config.settings.output_format, true).ok())
            .unwrap_or_default();
        let no_color = cli.no_color || !config.settings.color;
        let output = OutputWriter::new(output_format, no_color);

        let data_file = match cli.data_file.clone().or_else(|| config.data_file.clone()) {
            Some(path) => path,
            None => Self::default_data_file()?,
        };

        Ok(Self {
            verbose: cli.verbose || config.settings.verbose,
            config,
            output_format,
            output,
            data_file,
        })
    }

    /// Default ideas file location under the platform data directory
    pub fn default_data_file() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "abhub", "abhub-cli")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().join("ideas.json"))
    }

    /// Open the idea store at the resolved path
    pub fn store(&self) -> IdeaStore {
        IdeaStore::new(self.data_file.clone())
    }

    /// Average order value used when a command does not specify one
    pub fn default_aov(&self) -> f64 {
        self.config.settings.default_aov
    }

    /// Delay window used when a command does not specify one
    pub fn default_delay_days(&self) -> u32 {
        self.config.settings.default_delay_days
    }
}
