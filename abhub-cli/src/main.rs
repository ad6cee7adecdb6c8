use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod store;

use cli::{Cli, Commands};
use context::Context;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "✗".red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(&cli)?;
    init_tracing(ctx.verbose);

    match cli.command {
        Commands::SampleSize(cmd) => commands::sample_size::execute(&ctx, cmd),
        Commands::Significance(cmd) => commands::significance::execute(&ctx, cmd),
        Commands::Ideas(cmd) => commands::ideas::execute(&ctx, cmd),
        Commands::Dashboard(cmd) => commands::dashboard::execute(&ctx, cmd),
        Commands::OpportunityCost(cmd) => commands::opportunity_cost::execute(&ctx, cmd),
        Commands::Segments(cmd) => commands::segments::execute(&ctx, cmd),
        Commands::Principles(cmd) => commands::principles::execute(&ctx, cmd),
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "abhub_cli=debug,abhub_metrics=debug,abhub_core=debug"
    } else {
        "warn"
    };

    // Logs go to stderr so that json/yaml output stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
