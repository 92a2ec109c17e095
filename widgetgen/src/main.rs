mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use widgetgen_core::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-q
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level().into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    debug!(command = ?cli.command, "Parsed command line");

    match &cli.command {
        Commands::Typings(args) => commands::typings::run(&cli, args.clone()).await,
        Commands::Migrate(args) => commands::migrate::run(&cli, args.clone()).await,
        Commands::Init(args) => commands::init::run(&cli, args.clone()).await,
    }
}
