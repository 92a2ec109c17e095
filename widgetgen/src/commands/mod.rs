//! Command handlers for the widgetgen CLI.

pub mod init;
pub mod migrate;
pub mod typings;

use crate::cli::Cli;
use tracing::{error, info};
use widgetgen_core::{config::WidgetgenConfig, error::Result};

/// Loads the configuration named by `--config`, or discovers it from the
/// working directory.
pub fn load_config(cli: &Cli) -> Result<WidgetgenConfig> {
    let loaded = match &cli.config {
        Some(path) => WidgetgenConfig::from_path(path),
        None => WidgetgenConfig::new(),
    };
    match loaded {
        Ok(config) => {
            info!("Configuration loaded successfully");
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
