mod cli;
mod commands;
mod config;
mod env;
mod error;
mod event;
mod executor;
mod handler;
mod logger;
#[cfg(test)]
mod mock;
mod output;
mod plan;
mod plugin_name;
mod reconcile;
mod registry;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = cli::Cli::parse();

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
