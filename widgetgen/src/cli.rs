//! Command-line interface definitions for widgetgen.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Widgetgen - pluggable widget typings generation and dependency migration
#[derive(Parser, Debug)]
#[command(name = "widgetgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to widgetgen.toml configuration file
    #[arg(short, long, global = true, env = "WIDGETGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log directive when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the props typings for a widget descriptor
    Typings(TypingsArgs),

    /// Upgrade outdated dependencies in package.json
    Migrate(MigrateArgs),

    /// Initialize a new widgetgen.toml configuration file
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TypingsArgs {
    /// Widget descriptor in xml2js JSON form
    pub descriptor: PathBuf,

    /// Widget name (default: descriptor file stem in PascalCase)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output file path (default: {output_path}{Name}Props.d.ts)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the typings instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Skip the dependency migration
    #[arg(long)]
    pub skip_migration: bool,

    /// Manifest path override (overrides config file)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}
