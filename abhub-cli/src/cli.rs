//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::config::ConfigCommands;
use crate::commands::dashboard::DashboardCommand;
use crate::commands::ideas::IdeasCommands;
use crate::commands::opportunity_cost::OpportunityCostCommand;
use crate::commands::principles::PrinciplesCommand;
use crate::commands::sample_size::SampleSizeCommand;
use crate::commands::segments::SegmentsCommand;
use crate::commands::significance::SignificanceCommand;
use crate::output::OutputFormat;

/// Prioritize, size and judge A/B tests from the terminal
#[derive(Debug, Parser)]
#[command(name = "abhub", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the ideas data file
    #[arg(long, global = true, env = "ABHUB_DATA_FILE", value_name = "PATH")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Estimate how many visitors and days a test needs
    SampleSize(SampleSizeCommand),

    /// Judge whether test results are statistically significant
    Significance(SignificanceCommand),

    /// Manage the test idea backlog
    Ideas(IdeasCommands),

    /// Summarize the whole backlog on one screen
    Dashboard(DashboardCommand),

    /// Price the revenue lost while a test idea waits
    OpportunityCost(OpportunityCostCommand),

    /// Browse audience segment profiles
    Segments(SegmentsCommand),

    /// Browse persuasion principle playbook cards
    Principles(PrinciplesCommand),

    /// Manage CLI configuration
    Config(ConfigCommands),
}
