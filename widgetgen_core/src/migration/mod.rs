//! Dependency migration for widget projects.
//!
//! [`Migrator`] compares the versions declared in `package.json` against
//! the fixed tables in [`table`], asks the developer for confirmation,
//! rewrites the manifest in one pass and reinstalls the dependencies.
//! The prompt and the package manager sit behind the [`Prompter`] and
//! [`PackageInstaller`] traits.

pub mod manifest;
pub mod table;

use crate::error::{Result, WidgetgenError};
use async_trait::async_trait;
use manifest::{
    DEPENDENCIES, DEV_DEPENDENCIES, OUTDATED_GROUPS, OVERRIDES, OutdatedDependency,
    PackageManifest, RESOLUTIONS,
};
use std::path::{Path, PathBuf};
use table::{DEPENDENCY_UPGRADES, RESOLUTION_PINS, UpgradeEntry};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

pub const UPGRADE_QUESTION: &str = "Your widget contains outdated dependencies that will not work with this version of Pluggable Widgets Tools, do you want to upgrade it automatically? [Y/n]: ";

/// Asks the developer a yes/no question.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, question: &str) -> Result<bool>;
}

/// Runs the package manager after the manifest has been rewritten.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn install(&self, working_dir: &Path) -> Result<()>;
}

/// An empty answer counts as yes; otherwise only `y` does.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim_end_matches(['\r', '\n']);
    answer.is_empty() || answer.eq_ignore_ascii_case("y")
}

/// Prompts on the process terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

#[async_trait]
impl Prompter for StdinPrompter {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await?;
        Ok(is_affirmative(&answer))
    }
}

/// Spawns a package-manager command such as `npm install`.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    command: String,
}

impl CommandInstaller {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl PackageInstaller for CommandInstaller {
    async fn install(&self, working_dir: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| WidgetgenError::install("install command is empty"))?;

        info!(command = %self.command, working_dir = ?working_dir, "Installing dependencies");
        let status = tokio::process::Command::new(program)
            .args(parts)
            .current_dir(working_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(WidgetgenError::install(format!(
                "`{}` exited with {}",
                self.command, status
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Idle,
    Checking,
    Prompting,
    Rewriting,
    Installing,
    Done,
    Skipped,
    Failed,
}

/// What a migration changed, per manifest group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub updated: Vec<(&'static str, Vec<OutdatedDependency>)>,
    pub added: Vec<(&'static str, Vec<String>)>,
    pub patch_registered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Skipped,
    UpToDate,
    Declined,
    Migrated(MigrationReport),
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub working_dir: PathBuf,
    /// Manifest path, relative to `working_dir` unless absolute.
    pub manifest: PathBuf,
    /// Directory holding the patch files shipped with the toolchain.
    pub patches_source: PathBuf,
    pub skip_migration: bool,
    pub ci: bool,
}

impl MigrationOptions {
    pub fn manifest_path(&self) -> PathBuf {
        self.working_dir.join(&self.manifest)
    }
}

pub struct Migrator<P, I> {
    options: MigrationOptions,
    prompter: P,
    installer: I,
    state: MigrationState,
}

impl<P: Prompter, I: PackageInstaller> Migrator<P, I> {
    pub fn new(options: MigrationOptions, prompter: P, installer: I) -> Self {
        Self {
            options,
            prompter,
            installer,
            state: MigrationState::Idle,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Runs the migration once. Only reading the manifest fails with an
    /// error; later failures are logged and reported as
    /// [`MigrationOutcome::Failed`].
    pub async fn run(&mut self) -> Result<MigrationOutcome> {
        info!("Checking if dependencies should be migrated...");
        self.state = MigrationState::Checking;

        let manifest_path = self.options.manifest_path();
        let mut manifest = PackageManifest::read(&manifest_path)?;

        if self.options.skip_migration || self.options.ci {
            warn!(
                skip_migration = self.options.skip_migration,
                ci = self.options.ci,
                "Skipping dependency migration"
            );
            self.state = MigrationState::Skipped;
            return Ok(MigrationOutcome::Skipped);
        }

        let outdated = collect_outdated(&manifest);
        let outdated_count: usize = outdated.iter().map(|(_, deps)| deps.len()).sum();
        debug!(outdated_count, "Compared manifest against upgrade tables");

        if outdated_count == 0 {
            info!("Dependencies up-to-date.");
            self.state = MigrationState::Done;
            return Ok(MigrationOutcome::UpToDate);
        }

        self.state = MigrationState::Prompting;
        if !self.prompter.confirm(UPGRADE_QUESTION).await? {
            info!("Dependency upgrade declined");
            self.state = MigrationState::Done;
            return Ok(MigrationOutcome::Declined);
        }

        self.state = MigrationState::Rewriting;
        let report = match self.rewrite(&mut manifest, outdated) {
            Ok(report) => report,
            Err(err) => return Ok(self.fail(err)),
        };

        self.state = MigrationState::Installing;
        let install_dir = manifest_path
            .parent()
            .unwrap_or(&self.options.working_dir);
        if let Err(err) = self.installer.install(install_dir).await {
            return Ok(self.fail(err));
        }

        info!(
            manifest = ?manifest_path,
            patch_registered = report.patch_registered,
            "Dependency migration complete"
        );
        self.state = MigrationState::Done;
        Ok(MigrationOutcome::Migrated(report))
    }

    fn rewrite(
        &self,
        manifest: &mut PackageManifest,
        outdated: Vec<(&'static str, Vec<OutdatedDependency>)>,
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for (key, deps) in &outdated {
            if manifest.replace_outdated(
                key,
                deps,
                &self.options.patches_source,
                &self.options.working_dir,
            )? {
                report.patch_registered = true;
            }
        }
        report.updated = outdated
            .into_iter()
            .filter(|(_, deps)| !deps.is_empty())
            .collect();

        for key in [OVERRIDES, RESOLUTIONS] {
            let added = manifest.add_missing_pins(key, RESOLUTION_PINS)?;
            if !added.is_empty() {
                report.added.push((key, added));
            }
        }

        if report.patch_registered {
            manifest.register_patch_step()?;
        }

        manifest.write()?;
        Ok(report)
    }

    fn fail(&mut self, err: WidgetgenError) -> MigrationOutcome {
        error!(error = %err, "An error occurred while auto updating your dependencies");
        self.state = MigrationState::Failed;
        MigrationOutcome::Failed {
            reason: err.to_string(),
        }
    }
}

fn table_for(key: &str) -> &'static [UpgradeEntry] {
    match key {
        DEPENDENCIES | DEV_DEPENDENCIES => DEPENDENCY_UPGRADES,
        _ => RESOLUTION_PINS,
    }
}

fn collect_outdated(manifest: &PackageManifest) -> Vec<(&'static str, Vec<OutdatedDependency>)> {
    OUTDATED_GROUPS
        .iter()
        .map(|key| (*key, manifest.find_outdated(key, table_for(key))))
        .collect()
}
