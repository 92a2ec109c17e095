// Widgetgen - typings generation and dependency migration for pluggable widgets

// Common modules
pub mod config;
pub mod error;

// Widget descriptor model
pub mod descriptor;
// Typings - TypeScript declarations for widget props
pub mod typings;

// Migration - package.json dependency upgrades
pub mod migration;

// Re-export commonly used items for convenience
pub use config::WidgetgenConfig;
pub use descriptor::{Platform, Property, PropertyKind, WidgetDescriptor, raw::WidgetDocument};
pub use error::{Result, WidgetgenError};
pub use migration::{MigrationOptions, MigrationOutcome, Migrator};
pub use typings::{generate_for_descriptor, generate_for_widget};
