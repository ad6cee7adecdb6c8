//! Configuration management commands

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::context::Context;
use crate::output::OutputFormat;

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. settings.default_aov)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration and data file paths
    Path,

    /// Reset the configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Set { key, value } => set(ctx, &key, &value),
        ConfigSubcommand::Path => path(ctx),
        ConfigSubcommand::Reset { force } => reset(ctx, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    println!("{}", "Configuration".bold().underline());
    println!();
    println!("{}", "Settings:".cyan());
    println!("  output_format: {}", ctx.config.settings.output_format);
    println!("  color: {}", ctx.config.settings.color);
    println!("  verbose: {}", ctx.config.settings.verbose);
    println!("  default_aov: {}", ctx.config.settings.default_aov);
    println!(
        "  default_delay_days: {}",
        ctx.config.settings.default_delay_days
    );
    println!();
    println!("{} {}", "Data file:".cyan(), ctx.data_file.display());
    Ok(())
}

fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["settings", setting] => match *setting {
            "output_format" => {
                OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown output format: {}", value))?;
                config.settings.output_format = value.to_string();
            }
            "color" => {
                config.settings.color = value.parse().context("Invalid boolean value")?;
            }
            "verbose" => {
                config.settings.verbose = value.parse().context("Invalid boolean value")?;
            }
            "default_aov" => {
                config.settings.default_aov = value.parse().context("Invalid number")?;
            }
            "default_delay_days" => {
                config.settings.default_delay_days =
                    value.parse().context("Invalid number")?;
            }
            _ => bail!("Unknown setting: {}", setting),
        },
        ["data_file"] => {
            config.data_file = Some(PathBuf::from(value));
        }
        _ => bail!("Unknown configuration key: {}", key),
    }

    config.save().context("Failed to save configuration")?;
    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn path(ctx: &Context) -> Result<()> {
    println!("{}", "Paths".bold().underline());
    println!();

    match CliConfig::config_path() {
        Ok(config_path) => {
            let status = if config_path.exists() {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("  Config:    {} {}", status, config_path.display());
        }
        Err(err) => println!("  Config:    error: {}", err),
    }

    let status = if ctx.data_file.exists() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("  Data file: {} {}", status, ctx.data_file.display());
    Ok(())
}

fn reset(ctx: &Context, force: bool) -> Result<()> {
    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;
        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    CliConfig::default()
        .save()
        .context("Failed to save configuration")?;
    ctx.output.success("Configuration reset to defaults");
    Ok(())
}
