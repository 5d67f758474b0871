//! Toolchain discovery for example compilation.
//!
//! Locates the front-end translator (`ni`) and the back-end code
//! generator (`inform6`) before anything is extracted, so a missing
//! tool aborts the run instead of failing every example.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default front-end executable name.
pub const DEFAULT_FRONT_END: &str = "ni";

/// Default back-end executable name.
pub const DEFAULT_BACK_END: &str = "inform6";

/// Resolved paths of the two external compilers.
#[derive(Debug, Clone)]
pub struct ToolchainManager {
    /// Path to the front-end translator
    front_end: PathBuf,

    /// Path to the back-end code generator
    back_end: PathBuf,
}

impl ToolchainManager {
    /// Locate the given tools. Names are searched in PATH; paths are
    /// checked as-is.
    pub fn with_tools(front_end: impl AsRef<Path>, back_end: impl AsRef<Path>) -> Result<Self> {
        let front_end = Self::find_tool(front_end.as_ref())?;
        let back_end = Self::find_tool(back_end.as_ref())?;

        tracing::debug!(
            "Using front-end {} and back-end {}",
            front_end.display(),
            back_end.display()
        );

        Ok(Self {
            front_end,
            back_end,
        })
    }

    /// Get the front-end path.
    pub fn front_end(&self) -> &Path {
        &self.front_end
    }

    /// Get the back-end path.
    pub fn back_end(&self) -> &Path {
        &self.back_end
    }

    fn find_tool(tool: &Path) -> Result<PathBuf> {
        which::which(tool).map_err(|e| Error::MissingTool {
            tool: tool.display().to_string(),
            message: e.to_string(),
        })
    }
}
