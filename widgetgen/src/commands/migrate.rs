//! Migrate command - upgrades outdated widget dependencies.

use crate::cli::{Cli, MigrateArgs};
use crate::commands::load_config;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use widgetgen_core::{
    error::Result,
    migration::{
        CommandInstaller, MigrationOptions, MigrationOutcome, Migrator, StdinPrompter,
    },
};

/// Runs the migrate command. Migration problems are logged, never fatal.
pub async fn run(cli: &Cli, args: MigrateArgs) -> Result<()> {
    let config = load_config(cli)?;
    let working_dir = env::current_dir()?;

    let options = MigrationOptions {
        patches_source: working_dir.join(&config.migration.patches_path),
        manifest: args
            .manifest
            .unwrap_or_else(|| PathBuf::from(&config.migration.manifest)),
        working_dir,
        skip_migration: args.skip_migration,
        ci: is_ci(env::var("CI").ok().as_deref()),
    };

    let mut migrator = Migrator::new(
        options,
        StdinPrompter,
        CommandInstaller::new(&config.migration.install_command),
    );

    match migrator.run().await {
        Ok(MigrationOutcome::Migrated(report)) => {
            info!(
                groups_updated = report.updated.len(),
                groups_extended = report.added.len(),
                "Dependencies migrated"
            );
        }
        Ok(MigrationOutcome::Failed { reason }) => {
            error!("Dependency migration failed: {}", reason);
        }
        Ok(outcome) => {
            info!(outcome = ?outcome, "Dependency migration finished");
        }
        Err(e) => {
            error!("Failed to check dependencies: {}", e);
        }
    }
    Ok(())
}

fn is_ci(value: Option<&str>) -> bool {
    value == Some("true")
}
