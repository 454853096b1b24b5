//! modforge - build variant resolver CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modforge_cli::cmd;
use modforge_cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let prefix = cli.prefix.as_deref();

    match cli.command {
        Commands::List => cmd::list::list(),
        Commands::Info { formula } => cmd::info::info(&formula),
        Commands::Resolve {
            formula,
            with,
            macos,
            no_build_tools,
            json,
        } => cmd::resolve::resolve(&formula, &with, macos, !no_build_tools, json, prefix),
        Commands::Check { path } => cmd::check::check(&path),
    }
}
