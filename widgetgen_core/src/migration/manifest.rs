//! In-memory editing of a `package.json` manifest.

use super::table::{TargetVersion, UpgradeEntry};
use crate::error::{Result, WidgetgenError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEPENDENCIES: &str = "dependencies";
pub const DEV_DEPENDENCIES: &str = "devDependencies";
pub const OVERRIDES: &str = "overrides";
pub const RESOLUTIONS: &str = "resolutions";

/// Groups checked for outdated entries, in rewrite order.
pub const OUTDATED_GROUPS: [&str; 4] = [DEPENDENCIES, DEV_DEPENDENCIES, OVERRIDES, RESOLUTIONS];

const PATCH_PACKAGE: &str = "patch-package";
const PATCH_PACKAGE_VERSION: &str = "^6.5.0";
const PATCHES_DIR: &str = "patches";

/// A dependency whose installed version must be migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedDependency {
    pub name: String,
    pub old_version: String,
    pub new_version: TargetVersion,
    pub patch: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    path: PathBuf,
    value: Value,
}

impl PackageManifest {
    pub fn read(path: &Path) -> Result<PackageManifest> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        Self::from_value(path, value)
    }

    pub fn from_value(path: &Path, value: Value) -> Result<PackageManifest> {
        if !value.is_object() {
            return Err(WidgetgenError::manifest(path, "manifest root is not an object"));
        }
        Ok(PackageManifest {
            path: path.to_path_buf(),
            value,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Writes the manifest back with two-space indentation, keeping key order.
    pub fn write(&self) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(&self.value)?;
        contents.push('\n');
        fs::write(&self.path, contents)?;
        debug!(path = ?self.path, "Manifest written");
        Ok(())
    }

    fn root_mut(&mut self) -> Result<&mut Map<String, Value>> {
        let path = self.path.clone();
        self.value
            .as_object_mut()
            .ok_or_else(|| WidgetgenError::manifest(path, "manifest root is not an object"))
    }

    fn group(&self, key: &str) -> Option<&Map<String, Value>> {
        self.value.get(key).and_then(Value::as_object)
    }

    /// Returns the group, creating an empty one when it is missing.
    fn group_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>> {
        let path = self.path.clone();
        let root = self.root_mut()?;
        let group = root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        group
            .as_object_mut()
            .ok_or_else(|| WidgetgenError::manifest(path, format!("`{key}` is not an object")))
    }

    /// Installed version of `name` in the group, if declared with a non-empty string.
    pub fn version_of(&self, key: &str, name: &str) -> Option<&str> {
        match self.group(key)?.get(name)? {
            Value::String(version) if !version.is_empty() => Some(version.as_str()),
            Value::String(_) | Value::Null => None,
            other => {
                warn!(group = %key, name = %name, value = %other, "Ignoring non-string dependency version");
                None
            }
        }
    }

    /// Whether the group declares `name` with a truthy value. Objects such
    /// as nested overrides count as declared.
    pub fn declares(&self, key: &str, name: &str) -> bool {
        match self.group(key).and_then(|group| group.get(name)) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(value)) => !value.is_empty(),
            Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
            Some(_) => true,
        }
    }

    /// Entries of `table` declared in the group whose installed version is outdated.
    pub fn find_outdated(&self, key: &str, table: &[UpgradeEntry]) -> Vec<OutdatedDependency> {
        table
            .iter()
            .filter_map(|entry| {
                let installed = self.version_of(key, entry.name)?;
                entry.is_outdated(installed).then(|| OutdatedDependency {
                    name: entry.name.to_string(),
                    old_version: installed.to_string(),
                    new_version: entry.target,
                    patch: entry.patch,
                })
            })
            .collect()
    }

    /// Removes or bumps every outdated entry of the group. Patch files are
    /// copied from `patches_source` into `<project_dir>/patches`. Returns
    /// whether any patch was copied.
    pub fn replace_outdated(
        &mut self,
        key: &str,
        outdated: &[OutdatedDependency],
        patches_source: &Path,
        project_dir: &Path,
    ) -> Result<bool> {
        if outdated.is_empty() {
            return Ok(false);
        }

        info!("The following {} were updated:", key);
        let mut require_patch = false;
        let group = self.group_mut(key)?;

        for dep in outdated {
            match dep.new_version {
                TargetVersion::Remove => {
                    group.shift_remove(&dep.name);
                    info!("{}: {} -> (removed)", dep.name, dep.old_version);
                }
                TargetVersion::Version(version) => {
                    group.insert(dep.name.clone(), Value::String(version.to_string()));
                    if let Some(patch) = dep.patch {
                        copy_patch(patches_source, project_dir, patch)?;
                        require_patch = true;
                    }
                    info!("{}: {} -> {}", dep.name, dep.old_version, version);
                }
            }
        }
        Ok(require_patch)
    }

    /// Adds every pin the group does not declare yet. Returns the added names.
    pub fn add_missing_pins(&mut self, key: &str, pins: &[UpgradeEntry]) -> Result<Vec<String>> {
        let missing: Vec<&UpgradeEntry> = pins
            .iter()
            .filter(|pin| !self.declares(key, pin.name))
            .collect();
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        info!("The following {} were added:", key);
        let group = self.group_mut(key)?;
        let mut added = Vec::new();
        for pin in missing {
            group.insert(pin.name.to_string(), Value::String(pin.target.to_string()));
            info!("{}: {}", pin.name, pin.target);
            added.push(pin.name.to_string());
        }
        Ok(added)
    }

    /// Makes sure `patch-package` is installed and runs on `postinstall`.
    pub fn register_patch_step(&mut self) -> Result<()> {
        let dev_dependencies = self.group_mut(DEV_DEPENDENCIES)?;
        let has_patch_package = matches!(
            dev_dependencies.get(PATCH_PACKAGE),
            Some(Value::String(v)) if !v.is_empty()
        );
        if !has_patch_package {
            dev_dependencies.insert(
                PATCH_PACKAGE.to_string(),
                Value::String(PATCH_PACKAGE_VERSION.to_string()),
            );
        }

        let scripts = self.group_mut("scripts")?;
        let postinstall = match scripts.get("postinstall") {
            Some(Value::String(current)) if !current.is_empty() => {
                if current.contains(PATCH_PACKAGE) {
                    return Ok(());
                }
                format!("{PATCH_PACKAGE} && {current}")
            }
            _ => PATCH_PACKAGE.to_string(),
        };
        debug!(postinstall = %postinstall, "Registering patch step");
        scripts.insert("postinstall".to_string(), Value::String(postinstall));
        Ok(())
    }
}

fn copy_patch(patches_source: &Path, project_dir: &Path, patch: &str) -> Result<()> {
    let target_dir = project_dir.join(PATCHES_DIR);
    if !target_dir.exists() {
        fs::create_dir_all(&target_dir)?;
    }
    let source = patches_source.join(patch);
    debug!(source = ?source, target = ?target_dir, "Copying patch file");
    fs::copy(&source, target_dir.join(patch))?;
    Ok(())
}
