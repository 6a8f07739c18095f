//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::config::Config;
use crate::logging::init_logging;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration; flags override file values
    let config = Config::load()?;

    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    let mut client_config = config.resolver;
    if let Some(timeout_ms) = cli.timeout_ms {
        client_config.timeout_ms = timeout_ms;
    }

    // Create context for commands
    let ctx = commands::Context {
        client_config,
        output_format,
        attempts: cli.attempts,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Ip(args) => commands::lookup::execute(ctx, &args.address, "ip").await,
        Commands::Domain(args) => commands::lookup::execute(ctx, &args.name, "domain").await,
        Commands::Lookup(args) => commands::lookup::execute(ctx, &args.query, &args.kind).await,
        Commands::Batch(args) => commands::batch::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}
