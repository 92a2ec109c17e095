//! Typings generation for pluggable widgets.
//!
//! [`generate_for_widget`] validates a descriptor document, runs the client
//! and preview generators over its properties and assembles one TypeScript
//! declaration file. The output layout is fixed:
//!
//! 1. header comment naming the source descriptor,
//! 2. import lines for symbols the declarations actually use,
//! 3. client auxiliary types, preview auxiliary types, the client props
//!    interface and finally the preview props interface.

pub mod client;
pub mod helpers;
pub mod imports;
pub mod preview;

use crate::descriptor::{WidgetDescriptor, raw::WidgetDocument};
use crate::error::Result;
use client::generate_client_types;
use imports::{ExternalImports, generate_imports};
use preview::generate_preview_types;
use tracing::{debug, info};

/// Declarations produced by one generator. The last declaration is the
/// primary interface; everything before it is auxiliary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTypes {
    pub declarations: Vec<String>,
    pub imports: ExternalImports,
}

impl GeneratedTypes {
    pub fn auxiliary(&self) -> &[String] {
        match self.declarations.split_last() {
            Some((_, auxiliary)) => auxiliary,
            None => &[],
        }
    }

    pub fn primary(&self) -> Option<&String> {
        self.declarations.last()
    }
}

pub fn generate_for_widget(document: &WidgetDocument, widget_name: &str) -> Result<String> {
    let descriptor = WidgetDescriptor::from_document(document)?;
    generate_for_descriptor(&descriptor, widget_name)
}

pub fn generate_for_descriptor(descriptor: &WidgetDescriptor, widget_name: &str) -> Result<String> {
    info!(
        widget = %widget_name,
        platform = ?descriptor.platform,
        property_count = descriptor.properties.len(),
        "Generating widget typings"
    );

    let client_types = generate_client_types(
        widget_name,
        &descriptor.properties,
        &descriptor.system_properties,
        descriptor.platform,
    );
    let preview_types = generate_preview_types(
        widget_name,
        &descriptor.properties,
        &descriptor.system_properties,
    );

    let generated_types_code = client_types
        .auxiliary()
        .iter()
        .chain(preview_types.auxiliary())
        .chain(client_types.primary())
        .chain(preview_types.primary())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut external_imports = client_types.imports.clone();
    external_imports.merge(&preview_types.imports);

    let import_lines = generate_imports(&generated_types_code, &external_imports)?;
    debug!(
        declaration_count = client_types.declarations.len() + preview_types.declarations.len(),
        import_count = import_lines.len(),
        "Assembling typings output"
    );

    let imports = if import_lines.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", import_lines.join("\n"))
    };

    let output = format!(
        "/**
 * This file was generated from {widget_name}.xml
 * WARNING: All changes made to this file will be overwritten
 * @author Mendix Widgets Framework Team
 */
{imports}{generated_types_code}
"
    );

    info!(output_length = output.len(), "Widget typings generation complete");
    Ok(output)
}
