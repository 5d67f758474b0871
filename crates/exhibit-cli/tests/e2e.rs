//! End-to-end tests for Exhibit CLI commands.
//!
//! Compiling commands run against shell-script stand-ins for the
//! front-end and back-end, so they are Unix-only.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary project with an extensions directory.
struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(temp_dir.path().join("extensions")).unwrap();
        Self { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn document(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path().join("extensions").join(name);
        fs::write(&path, text).expect("Failed to write document");
        path
    }

    fn destination(&self) -> PathBuf {
        self.path().join("release")
    }

    fn workspace(&self) -> PathBuf {
        self.path().join("tmp")
    }

    /// Install stand-in compilers; the front-end rejects `BROKEN` sources.
    #[cfg(unix)]
    fn install_tools(&self) {
        use std::os::unix::fs::PermissionsExt;

        let tools = self.path().join("tools");
        fs::create_dir_all(&tools).unwrap();
        for (name, body) in [
            (
                "ni",
                "if grep -q BROKEN Source/story.ni; then\n  echo 'Problem. That sentence is BROKEN.'\n  exit 1\nfi\ncp Source/story.ni Build/auto.inf",
            ),
            ("inform6", "cp \"$1\" \"$5\""),
        ] {
            let path = tools.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// `exhibit` with every location pointed into the project.
    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = exhibit();
        cmd.current_dir(self.path())
            .env_remove("EXHIBIT_FRONT_END")
            .env_remove("EXHIBIT_BACK_END")
            .arg(subcommand)
            .arg("--documents")
            .arg(self.path().join("extensions"))
            .arg("--workspace")
            .arg(self.workspace())
            .arg("--destination")
            .arg(self.destination())
            .arg("--front-end")
            .arg(self.path().join("tools/ni"))
            .arg("--back-end")
            .arg(self.path().join("tools/inform6"));
        cmd
    }
}

fn exhibit() -> Command {
    Command::cargo_bin("exhibit").expect("Failed to find exhibit binary")
}

const WORKING: &str = "Example: * Lit Room - A room with light.

\tThe Lab is a room.

\tTest me with \"look\".
";

const MIXED: &str = "Example: * Lit Room - A room with light.

\tThe Lab is a room.

Example: ** Broken

\tThe Den is BROKEN.
";

// =============================================================================
// Extract Command
// =============================================================================

#[test]
fn test_extract_lists_examples() {
    let project = TestProject::new();
    let document = project.document("Vorple Demo.i7x", MIXED);

    exhibit()
        .arg("extract")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vorple Demo"))
        .stdout(predicate::str::contains("Lit Room"))
        .stdout(predicate::str::contains("A room with light."))
        .stdout(predicate::str::contains("Broken"));
}

#[test]
fn test_extract_json() {
    let project = TestProject::new();
    let document = project.document("Vorple Demo.i7x", WORKING);

    let output = exhibit()
        .arg("extract")
        .arg(&document)
        .arg("--json")
        .output()
        .expect("Failed to run exhibit");
    assert!(output.status.success());

    let examples: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output is not JSON");
    let examples = examples.as_array().unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0]["title"], "Lit Room");
    assert_eq!(examples[0]["difficulty"], 1);
    assert_eq!(examples[0]["test_command"], "look");
    assert_eq!(examples[0]["line"], 1);
}

#[test]
fn test_extract_without_examples() {
    let project = TestProject::new();
    let document = project.document("Vorple Prose.i7x", "Only prose here.\n");

    exhibit()
        .arg("extract")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("No examples found"));
}

#[test]
fn test_extract_missing_file_fails() {
    exhibit()
        .arg("extract")
        .arg("/nonexistent/Vorple.i7x")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read document"));
}

// =============================================================================
// Run Command
// =============================================================================

#[cfg(unix)]
#[test]
fn test_run_all_compiled() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Vorple Demo.i7x", WORKING);

    project.command("run").assert().success().code(0);

    let dest = project.destination();
    assert!(dest.join("Vorple Demo/Lit Room.z8").is_file());
    assert!(dest.join("Vorple Demo/Lit Room.txt").is_file());
    let index = fs::read_to_string(dest.join("index.html")).unwrap();
    assert!(index.contains("href=\"Vorple%20Demo/Lit%20Room.z8\""));
}

#[cfg(unix)]
#[test]
fn test_run_reports_failures_and_continues() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Vorple Demo.i7x", MIXED);

    project
        .command("run")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("[Vorple Demo/Broken] front-end failed:"))
        .stdout(predicate::str::contains("Problem. That sentence is BROKEN."));

    let dest = project.destination();
    assert!(dest.join("Vorple Demo/Lit Room.z8").is_file());
    assert!(!dest.join("Vorple Demo/Broken.z8").exists());
    assert!(dest.join("index.html").is_file());
}

#[cfg(unix)]
#[test]
fn test_run_writes_json_report() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Vorple Demo.i7x", MIXED);
    let report = project.path().join("report.json");

    project
        .command("run")
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let examples = report["examples"].as_array().unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0]["outcome"], "compiled");
    assert_eq!(examples[1]["outcome"], "front-end-failed");
    assert!(report["document_failures"].as_array().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_run_filters_by_prefix() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Vorple Demo.i7x", WORKING);
    project.document("Other Demo.i7x", MIXED);

    project.command("run").assert().success();

    assert!(project.destination().join("Vorple Demo").is_dir());
    assert!(!project.destination().join("Other Demo").exists());
}

#[cfg(unix)]
#[test]
fn test_run_reads_config_file() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Glimmr Demo.i7x", WORKING);
    fs::write(
        project.path().join("exhibit.toml"),
        "[input]\nprefix = \"Glimmr\"\n\n[output]\nindex_file = \"examples.html\"\n",
    )
    .unwrap();

    project.command("run").assert().success();

    assert!(project.destination().join("examples.html").is_file());
    assert!(project.destination().join("Glimmr Demo/Lit Room.z8").is_file());
}

#[cfg(unix)]
#[test]
fn test_run_missing_tool_is_fatal() {
    let project = TestProject::new();
    project.document("Vorple Demo.i7x", WORKING);

    project
        .command("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!project.destination().join("index.html").exists());
}

#[cfg(unix)]
#[test]
fn test_run_missing_documents_dir_is_fatal() {
    let project = TestProject::new();
    project.install_tools();

    fs::remove_dir_all(project.path().join("extensions")).unwrap();

    project
        .command("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read documents directory"));
}

// =============================================================================
// Story and Clean Commands
// =============================================================================

#[cfg(unix)]
#[test]
fn test_story_compiles_single_file() {
    let project = TestProject::new();
    project.install_tools();
    let story = project.path().join("story.ni");
    fs::write(&story, "The Lab is a room.\n").unwrap();
    let output = project.path().join("out/story.z8");

    project
        .command("story")
        .arg(&story)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "The Lab is a room.\n");
}

#[cfg(unix)]
#[test]
fn test_story_failure_is_fatal() {
    let project = TestProject::new();
    project.install_tools();
    let story = project.path().join("story.ni");
    fs::write(&story, "The Den is BROKEN.\n").unwrap();

    project
        .command("story")
        .arg(&story)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("front-end failed:"));
}

#[cfg(unix)]
#[test]
fn test_clean_removes_outputs() {
    let project = TestProject::new();
    project.install_tools();
    project.document("Vorple Demo.i7x", WORKING);

    project.command("run").assert().success();
    assert!(project.destination().is_dir());
    assert!(project.workspace().is_dir());

    project
        .command("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!project.destination().exists());
    assert!(!project.workspace().exists());
}

#[test]
fn test_help_lists_commands() {
    exhibit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("story"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("clean"));
}
