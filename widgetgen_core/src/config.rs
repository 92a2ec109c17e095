use crate::error::{Result, WidgetgenError};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

/// Name of the configuration file searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "widgetgen.toml";

/// Configuration for typings generation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypingsConfig {
    /// Directory the generated `<Widget>Props.d.ts` files are written to
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for TypingsConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

/// Configuration for the dependency migration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationConfig {
    /// Manifest file, relative to the working directory
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Directory holding the patch files shipped with the toolchain
    #[serde(default = "default_patches_path")]
    pub patches_path: String,
    /// Command run after the manifest has been rewritten
    #[serde(default = "default_install_command")]
    pub install_command: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            patches_path: default_patches_path(),
            install_command: default_install_command(),
        }
    }
}

fn default_output_path() -> String {
    "./typings/".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_patches_path() -> String {
    "./node_modules/@mendix/pluggable-widgets-tools/patches".to_string()
}

fn default_install_command() -> String {
    "npm install".to_string()
}

/// Root configuration for widgetgen
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WidgetgenConfig {
    #[serde(default)]
    pub typings: TypingsConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
}

impl WidgetgenConfig {
    /// Load configuration by searching for widgetgen.toml in the current
    /// directory and its ancestors. Falls back to defaults when no file exists.
    pub fn new() -> Result<WidgetgenConfig> {
        let current_dir = env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Same as [`WidgetgenConfig::new`], starting the search at `start`.
    pub fn discover_from(start: &Path) -> Result<WidgetgenConfig> {
        info!("Loading widgetgen configuration");
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        match Self::find_config_file(start) {
            Some(config_path) => {
                info!("Found configuration file at: {:?}", config_path);
                Self::from_path(&config_path)
            }
            None => {
                debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
                let mut config = WidgetgenConfig::default();
                config.substitute_all()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from an explicit file.
    pub fn from_path(config_path: &Path) -> Result<WidgetgenConfig> {
        if !config_path.is_file() {
            error!("Configuration file {:?} does not exist", config_path);
            return Err(WidgetgenError::InvalidPath {
                path: config_path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(config_path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            WidgetgenError::from(e)
        })?;

        debug!("Configuration file size: {} bytes", contents.len());

        let mut config: WidgetgenConfig = toml::from_str(&contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            WidgetgenError::config(e.to_string())
        })?;

        config.substitute_all()?;

        info!("Configuration loaded successfully");
        debug!(
            output_path = %config.typings.output_path,
            manifest = %config.migration.manifest,
            install_command = %config.migration.install_command,
            "Resolved configuration"
        );

        Ok(config)
    }

    fn substitute_all(&mut self) -> Result<()> {
        debug!("Substituting environment variables in configuration");
        self.typings.output_path = Self::substitute_env_vars(&self.typings.output_path)?;
        self.migration.manifest = Self::substitute_env_vars(&self.migration.manifest)?;
        self.migration.patches_path = Self::substitute_env_vars(&self.migration.patches_path)?;
        self.migration.install_command =
            Self::substitute_env_vars(&self.migration.install_command)?;
        Ok(())
    }

    /// Searches for `widgetgen.toml` starting from `start` and traversing up to the root.
    fn find_config_file(start: &Path) -> Option<PathBuf> {
        debug!("Starting config file search from: {:?}", start);

        for path in start.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.exists() {
                return Some(config_path);
            }
        }
        None
    }

    /// Substitute environment variables in config strings
    /// Supports ${VAR_NAME:-default} syntax
    fn substitute_env_vars(value: &str) -> Result<String> {
        trace!("Substituting environment variables in: {}", value);
        let mut result = value.to_string();

        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")?;

        for cap in re.captures_iter(value) {
            let var_name = &cap[1];
            let default_value = cap.get(2).map(|m| m.as_str());

            let replacement = match env::var(var_name) {
                Ok(val) => {
                    debug!("Resolved environment variable: {}", var_name);
                    val
                }
                Err(_) => match default_value {
                    Some(default) => {
                        warn!(
                            "Environment variable {} not set, using default: {}",
                            var_name, default
                        );
                        default.to_string()
                    }
                    None => {
                        error!(
                            "Environment variable {} not set and no default provided",
                            var_name
                        );
                        return Err(WidgetgenError::EnvVarNotSet(var_name.to_string()));
                    }
                },
            };

            result = result.replace(&cap[0], &replacement);
        }

        Ok(result)
    }
}
