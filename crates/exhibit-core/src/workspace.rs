//! Staging workspace shared with the external toolchain.
//!
//! The front-end compiler works on a project package with fixed
//! relative paths, so every example is compiled in the same place:
//!
//! ```text
//! <workspace>/
//! ├── Source/story.ni  # Staged example source
//! ├── Build/auto.inf   # Intermediate written by the front-end
//! └── Index/           # Front-end index and listing output
//! ```
//!
//! Only one example may occupy the workspace at a time. [`StagedExample`]
//! borrows the workspace mutably, so staging the next example requires
//! the previous handle to be gone.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::ExampleBlock;

/// Source slot directory name.
pub const SOURCE_DIR: &str = "Source";

/// Build output slot directory name.
pub const BUILD_DIR: &str = "Build";

/// Index/listing slot directory name.
pub const INDEX_DIR: &str = "Index";

/// Canonical name of the staged source file.
pub const SOURCE_FILE: &str = "story.ni";

/// Front-end intermediate artifact, relative to the build slot.
pub const INTERMEDIATE_FILE: &str = "auto.inf";

/// The shared staging directories.
#[derive(Debug, Clone)]
pub struct StagingWorkspace {
    /// Workspace root (the package directory handed to the front-end).
    pub root: PathBuf,

    /// Source slot.
    pub source_dir: PathBuf,

    /// Build output slot.
    pub build_dir: PathBuf,

    /// Index/listing slot.
    pub index_dir: PathBuf,

    /// Set once [`reset`](Self::reset) has succeeded.
    ready: bool,
}

impl StagingWorkspace {
    /// Describe a workspace rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_dir: root.join(SOURCE_DIR),
            build_dir: root.join(BUILD_DIR),
            index_dir: root.join(INDEX_DIR),
            root,
            ready: false,
        }
    }

    /// Wipe the workspace and recreate the three slots.
    ///
    /// # Errors
    /// Returns [`Error::Workspace`] if the location cannot be cleared or
    /// created.
    pub fn reset(&mut self) -> Result<()> {
        self.ready = false;

        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|source| Error::Workspace {
                path: self.root.clone(),
                source,
            })?;
        }

        for dir in [&self.source_dir, &self.build_dir, &self.index_dir] {
            fs::create_dir_all(dir).map_err(|source| Error::Workspace {
                path: dir.clone(),
                source,
            })?;
        }

        tracing::debug!("Reset staging workspace at {}", self.root.display());
        self.ready = true;
        Ok(())
    }

    /// Whether the workspace has been reset and can accept examples.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Path of the staged source file.
    pub fn source_path(&self) -> PathBuf {
        self.source_dir.join(SOURCE_FILE)
    }

    /// Path where the front-end leaves its intermediate artifact.
    pub fn intermediate_path(&self) -> PathBuf {
        self.build_dir.join(INTERMEDIATE_FILE)
    }

    /// Stage an example's body into the source slot.
    ///
    /// Overwrites the previous source and removes any stale intermediate.
    pub fn stage(&mut self, block: &ExampleBlock) -> Result<StagedExample<'_>> {
        let label = block.title.clone();
        self.stage_source(label, &block.source())
    }

    /// Stage arbitrary source text under `label`.
    pub fn stage_source(
        &mut self,
        label: impl Into<String>,
        source: &str,
    ) -> Result<StagedExample<'_>> {
        if !self.ready {
            return Err(Error::WorkspaceNotReady(self.root.clone()));
        }

        let intermediate = self.intermediate_path();
        if intermediate.exists() {
            fs::remove_file(&intermediate)?;
        }

        let source_path = self.source_path();
        fs::write(&source_path, source)?;

        let label = label.into();
        tracing::debug!("Staged '{}' at {}", label, source_path.display());

        Ok(StagedExample {
            workspace: self,
            label,
        })
    }
}

/// Handle to the example currently occupying the workspace.
#[derive(Debug)]
pub struct StagedExample<'a> {
    workspace: &'a StagingWorkspace,
    label: String,
}

impl StagedExample<'_> {
    /// Label of the staged example (its title).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Workspace root, used as the working directory for both stages.
    pub fn root(&self) -> &Path {
        &self.workspace.root
    }

    /// Staged source file.
    pub fn source_path(&self) -> PathBuf {
        self.workspace.source_path()
    }

    /// Intermediate artifact path, relative to the workspace root.
    pub fn relative_intermediate(&self) -> PathBuf {
        Path::new(BUILD_DIR).join(INTERMEDIATE_FILE)
    }

    /// Intermediate artifact path.
    pub fn intermediate_path(&self) -> PathBuf {
        self.workspace.intermediate_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn block(title: &str, body: &[&str]) -> ExampleBlock {
        ExampleBlock {
            title: title.to_string(),
            difficulty: 1,
            description: None,
            test_command: None,
            body: body.iter().map(|s| s.to_string()).collect(),
            line: 1,
        }
    }

    #[test]
    fn test_reset_creates_slots() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut workspace = StagingWorkspace::new(temp.path().join("tmp"));
        assert!(!workspace.is_ready());

        workspace.reset().expect("Failed to reset");

        assert!(workspace.is_ready());
        assert!(workspace.source_dir.is_dir());
        assert!(workspace.build_dir.is_dir());
        assert!(workspace.index_dir.is_dir());
    }

    #[test]
    fn test_reset_wipes_previous_contents() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut workspace = StagingWorkspace::new(temp.path().join("tmp"));
        workspace.reset().expect("Failed to reset");

        let leftover = workspace.index_dir.join("Contents.html");
        fs::write(&leftover, "old").expect("Failed to write file");

        workspace.reset().expect("Failed to reset again");
        assert!(!leftover.exists());
        assert!(workspace.index_dir.is_dir());
    }

    #[test]
    fn test_stage_before_reset_fails() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut workspace = StagingWorkspace::new(temp.path().join("tmp"));

        let err = workspace.stage(&block("A", &["X is a room."])).unwrap_err();
        assert!(matches!(err, Error::WorkspaceNotReady(_)));
    }

    #[test]
    fn test_stage_overwrites_source_and_clears_intermediate() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut workspace = StagingWorkspace::new(temp.path().join("tmp"));
        workspace.reset().expect("Failed to reset");

        {
            let staged = workspace
                .stage(&block("First", &["The Lab is a room.", "", "Test me with \"x\"."]))
                .expect("Failed to stage");
            assert_eq!(staged.label(), "First");
            let written = fs::read_to_string(staged.source_path()).unwrap();
            assert_eq!(written, "The Lab is a room.\n\nTest me with \"x\".");
            fs::write(staged.intermediate_path(), "! compiled").unwrap();
        }

        let staged = workspace
            .stage(&block("Second", &["The Den is a room."]))
            .expect("Failed to stage");
        assert_eq!(
            fs::read_to_string(staged.source_path()).unwrap(),
            "The Den is a room."
        );
        assert!(!staged.intermediate_path().exists());
        assert_eq!(staged.relative_intermediate(), Path::new("Build/auto.inf"));
    }
}
