//! cuba - CLI tool for exploring a CUBA REST API server.
//!
//! This is a thin wrapper over the `cuba-rest` library, intended for manual
//! inspection of entities, queries, services and metadata.

mod cli;
mod commands;
mod output;
mod prompt;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{entities, login, metadata, query, service};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Login(args) => login::run(&cli.connection, args).await,
        Commands::Entities(cmd) => entities::handle(&cli.connection, cmd).await,
        Commands::Query(args) => query::run(&cli.connection, args).await,
        Commands::Service(args) => service::run(&cli.connection, args).await,
        Commands::Metadata(cmd) => metadata::handle(&cli.connection, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays pipeable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
