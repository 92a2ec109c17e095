//! Init command - initializes widgetgen.toml configuration.

use crate::cli::{Cli, InitArgs};
use std::fs;
use std::path::Path;
use tracing::{error, info};
use widgetgen_core::{config::CONFIG_FILE_NAME, error::Result};

const STARTER_CONFIG: &str = r#"# Widgetgen Configuration

[typings]
# Directory the generated <Widget>Props.d.ts files are written to
output_path = "./typings/"

[migration]
# Manifest checked for outdated dependencies
manifest = "package.json"

# Patch files shipped with the pluggable widgets tools
patches_path = "./node_modules/@mendix/pluggable-widgets-tools/patches"

# Command run after package.json has been upgraded
install_command = "${WIDGETGEN_INSTALL_COMMAND:-npm install}"
"#;

/// Runs the init command.
pub async fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    write_starter_config(Path::new(CONFIG_FILE_NAME), args.force)
}

fn write_starter_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        error!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
        return Ok(());
    }

    fs::write(config_path, STARTER_CONFIG)?;
    info!("Created {}", CONFIG_FILE_NAME);
    info!("Next steps:");
    info!("  1. Edit {} to configure your project", CONFIG_FILE_NAME);
    info!("  2. Run 'widgetgen typings <descriptor>' to generate widget typings");
    Ok(())
}
