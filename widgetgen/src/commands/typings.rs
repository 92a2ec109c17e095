//! Typings command - generates the props typings for one widget.

use crate::cli::{Cli, TypingsArgs};
use crate::commands::load_config;
use convert_case::{Case, Casing};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use widgetgen_core::{
    descriptor::raw::WidgetDocument,
    error::{Result, WidgetgenError},
    typings::generate_for_widget,
};

/// Runs the typings command.
pub async fn run(cli: &Cli, args: TypingsArgs) -> Result<()> {
    info!(descriptor = ?args.descriptor, "Starting typings generation");

    let widget_name = match args.name {
        Some(name) => name,
        None => widget_name_from_path(&args.descriptor)?,
    };
    debug!(widget = %widget_name, "Resolved widget name");

    let document = WidgetDocument::from_file(&args.descriptor)?;
    let typings = match generate_for_widget(&document, &widget_name) {
        Ok(typings) => typings,
        Err(e) => {
            error!("Failed to generate typings for {}: {}", widget_name, e);
            return Err(e);
        }
    };

    if args.stdout {
        print!("{typings}");
        return Ok(());
    }

    let output_path = match args.output {
        Some(path) => path,
        None => {
            let config = load_config(cli)?;
            default_output_path(&config.typings.output_path, &widget_name)
        }
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, typings)?;
    info!("Typings written successfully to {:?}", output_path);
    Ok(())
}

/// `my-widget.xml.json` and `MyWidget.json` both name `MyWidget`.
fn widget_name_from_path(descriptor: &Path) -> Result<String> {
    let stem = descriptor
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| WidgetgenError::InvalidPath {
            path: descriptor.to_path_buf(),
        })?;
    let stem = stem.strip_suffix(".xml").unwrap_or(stem);
    Ok(stem.to_case(Case::Pascal))
}

fn default_output_path(output_dir: &str, widget_name: &str) -> PathBuf {
    PathBuf::from(format!("{output_dir}{widget_name}Props.d.ts"))
}
