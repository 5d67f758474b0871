//! Error types for exhibit-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for exhibit-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in exhibit-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The staging workspace could not be cleared or created.
    #[error("staging workspace {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An example was staged before the workspace was reset.
    #[error("staging workspace {} has not been reset", .0.display())]
    WorkspaceNotReady(PathBuf),

    /// An external compiler could not be located or started.
    #[error("{tool} unavailable: {message}")]
    MissingTool { tool: String, message: String },

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A source document could not be read.
    #[error("failed to read document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error aborts the whole run rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Workspace { .. }
                | Self::WorkspaceNotReady(_)
                | Self::MissingTool { .. }
                | Self::Config(_)
        )
    }

    /// Format the error with a recovery hint for terminal display.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::Workspace { .. } => {
                Some("check that the workspace directory is writable, or pass --workspace")
            }
            Self::WorkspaceNotReady(_) => Some("call reset() before staging examples"),
            Self::MissingTool { .. } => Some(
                "install the Inform toolchain or point --front-end/--back-end at the executables",
            ),
            Self::Config(_) => Some("see `exhibit run --help` for the available settings"),
            Self::Document { .. } | Self::Io(_) => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let missing = Error::MissingTool {
            tool: "ni".to_string(),
            message: "not found in PATH".to_string(),
        };
        assert!(missing.is_fatal());

        let document = Error::Document {
            path: PathBuf::from("Vorple.i7x"),
            source: std::io::Error::other("boom"),
        };
        assert!(!document.is_fatal());
        assert!(!Error::Io(std::io::Error::other("boom")).is_fatal());
    }

    #[test]
    fn test_hint_appended() {
        let err = Error::MissingTool {
            tool: "inform6".to_string(),
            message: "not found in PATH".to_string(),
        };
        let rendered = err.with_hint();
        assert!(rendered.starts_with("inform6 unavailable"));
        assert!(rendered.contains("hint:"));
    }
}
