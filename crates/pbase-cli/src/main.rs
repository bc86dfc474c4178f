//! pbase - CLI tool for PocketBase-style record services.
//!
//! A thin wrapper over `pbase-http` for poking at collections, records and
//! backups from a terminal.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{backups, collections, files, records, whoami};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    if let Err(err) = run(cli).await {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = cli.connection.client()?;

    match cli.command {
        Commands::Records(cmd) => records::handle(cmd, &client).await,
        Commands::Collections(cmd) => collections::handle(cmd, &client).await,
        Commands::Backups(cmd) => backups::handle(cmd, &client).await,
        Commands::Files(cmd) => files::handle(cmd, &client).await,
        Commands::Whoami(args) => whoami::run(args, &client).await,
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

    // Logs go to stderr so stdout stays pipeable JSON.
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
