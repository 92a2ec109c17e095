//! Dependency migration against real manifests on disk.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use widgetgen_core::migration::{
    MigrationOptions, MigrationOutcome, MigrationState, Migrator, PackageInstaller, Prompter,
};
use widgetgen_core::{Result, WidgetgenError};

#[derive(Clone)]
struct ScriptedPrompter {
    answer: bool,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::default(),
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, question: &str) -> Result<bool> {
        self.asked.lock().unwrap().push(question.to_string());
        Ok(self.answer)
    }
}

#[derive(Clone, Default)]
struct RecordingInstaller {
    fail: bool,
    runs: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl PackageInstaller for RecordingInstaller {
    async fn install(&self, working_dir: &Path) -> Result<()> {
        self.runs.lock().unwrap().push(working_dir.to_path_buf());
        if self.fail {
            return Err(WidgetgenError::install("npm install exited with 1"));
        }
        Ok(())
    }
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn with_manifest(manifest: Value) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            serde_json::to_string_pretty(&manifest).unwrap() + "\n",
        )
        .unwrap();
        Self { dir }
    }

    fn options(&self) -> MigrationOptions {
        MigrationOptions {
            working_dir: self.dir.path().to_path_buf(),
            manifest: PathBuf::from("package.json"),
            patches_source: self.dir.path().join("tools/patches"),
            skip_migration: false,
            ci: false,
        }
    }

    fn raw_manifest(&self) -> String {
        fs::read_to_string(self.dir.path().join("package.json")).unwrap()
    }

    fn manifest(&self) -> Value {
        serde_json::from_str(&self.raw_manifest()).unwrap()
    }
}

// ==================== Outcome Tests ====================

#[tokio::test]
async fn test_removes_outdated_react() {
    let project = Project::with_manifest(json!({
        "name": "my-widget",
        "dependencies": { "react": "17.0.2" },
        "overrides": {},
        "resolutions": {}
    }));

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());

    let outcome = migrator.run().await.unwrap();
    assert!(matches!(outcome, MigrationOutcome::Migrated(_)));

    let manifest = project.manifest();
    assert_eq!(manifest["dependencies"], json!({}));
    assert_eq!(manifest["overrides"]["react"], "18.2.0");
    assert_eq!(manifest["resolutions"]["react-native"], "0.70.7");
    assert_eq!(prompter.asked.lock().unwrap().len(), 1);
    assert_eq!(
        *installer.runs.lock().unwrap(),
        vec![project.dir.path().to_path_buf()]
    );
}

#[tokio::test]
async fn test_bumps_outdated_override() {
    let project = Project::with_manifest(json!({
        "overrides": { "react-native": "0.68.0" }
    }));

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());
    migrator.run().await.unwrap();

    let manifest = project.manifest();
    let overrides: Vec<_> = manifest["overrides"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(
        overrides,
        vec![
            "react-native",
            "react",
            "react-dom",
            "@types/react",
            "@types/react-dom",
            "@types/react-native"
        ]
    );
    assert_eq!(manifest["overrides"]["react-native"], "0.70.7");
}

#[tokio::test]
async fn test_skip_flag_leaves_manifest_untouched() {
    let project = Project::with_manifest(json!({ "dependencies": { "react": "17.0.2" } }));
    let before = project.raw_manifest();

    let mut options = project.options();
    options.skip_migration = true;
    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(options, prompter.clone(), installer.clone());

    assert_eq!(migrator.run().await.unwrap(), MigrationOutcome::Skipped);
    assert_eq!(project.raw_manifest(), before);
    assert!(prompter.asked.lock().unwrap().is_empty());
    assert!(installer.runs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_prompt() {
    let project = Project::with_manifest(json!({ "devDependencies": { "@types/jest": "^27.0.0" } }));
    let before = project.raw_manifest();

    let prompter = ScriptedPrompter::answering(false);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());

    assert_eq!(migrator.run().await.unwrap(), MigrationOutcome::Declined);
    assert_eq!(project.raw_manifest(), before);
    assert!(installer.runs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_up_to_date_manifest() {
    let project = Project::with_manifest(json!({
        "dependencies": { "classnames": "^2.3.2" },
        "devDependencies": { "@types/jest": "^29.2.0" },
        "resolutions": { "react": "18.2.0", "react-native": "0.70.9" }
    }));

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());

    assert_eq!(migrator.run().await.unwrap(), MigrationOutcome::UpToDate);
    assert!(prompter.asked.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_patch_registers_postinstall() {
    let project = Project::with_manifest(json!({
        "scripts": { "postinstall": "husky install" },
        "dependencies": { "react-native-gesture-handler": "1.9.0" },
        "devDependencies": {}
    }));
    let patches = project.dir.path().join("tools/patches");
    fs::create_dir_all(&patches).unwrap();
    fs::write(patches.join("react-native-gesture-handler+1.10.3.patch"), "patch").unwrap();

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());

    let MigrationOutcome::Migrated(report) = migrator.run().await.unwrap() else {
        panic!("expected the migration to run");
    };
    assert!(report.patch_registered);

    let manifest = project.manifest();
    assert_eq!(manifest["dependencies"]["react-native-gesture-handler"], "1.10.3");
    assert_eq!(manifest["devDependencies"]["patch-package"], "^6.5.0");
    assert_eq!(manifest["scripts"]["postinstall"], "patch-package && husky install");
    assert!(
        project
            .dir
            .path()
            .join("patches/react-native-gesture-handler+1.10.3.patch")
            .is_file()
    );
}

#[tokio::test]
async fn test_install_failure_is_reported_after_write() {
    let project = Project::with_manifest(json!({ "dependencies": { "react-dom": "17.0.2" } }));

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller {
        fail: true,
        ..Default::default()
    };
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());

    let outcome = migrator.run().await.unwrap();
    assert!(matches!(outcome, MigrationOutcome::Failed { .. }));
    assert_eq!(migrator.state(), MigrationState::Failed);
    assert_eq!(project.manifest()["dependencies"], json!({}));
}

#[tokio::test]
async fn test_output_format() {
    let project = Project::with_manifest(json!({ "name": "w", "dependencies": { "react": "17.0.2" } }));

    let prompter = ScriptedPrompter::answering(true);
    let installer = RecordingInstaller::default();
    let mut migrator = Migrator::new(project.options(), prompter.clone(), installer.clone());
    migrator.run().await.unwrap();

    let raw = project.raw_manifest();
    assert!(raw.starts_with("{\n  \"name\": \"w\",\n  \"dependencies\": {},\n  \"overrides\": {\n"));
    assert!(raw.ends_with("}\n"));
    assert!(!raw.ends_with("\n\n"));
}
