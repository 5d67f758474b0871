//! Run configuration.
//!
//! Settings are read from a TOML file with three tables, each optional:
//!
//! ```toml
//! [input]
//! documents_dir = "inform7/extensions"
//! prefix = "Vorple"
//!
//! [toolchain]
//! front_end = "ni"
//! back_end = "inform6"
//! rules_dir = "/Applications/Inform.app/Contents/Resources/Inform7/Extensions"
//! library_dir = "/Applications/Inform.app/Contents/Resources/Library/6.11"
//! story_format = "z8"
//! back_end_flags = "-kE2SDwv8"
//! timeout_secs = 600
//!
//! [output]
//! workspace_dir = "build/tmp/examples"
//! destination = "build/release/examples"
//! index_file = "index.html"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compile::{CompilerConfig, DEFAULT_BACK_END, DEFAULT_FRONT_END, ToolchainManager};
use crate::error::{Error, Result};
use crate::index::IndexTemplate;

/// Config file looked up in the current directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "exhibit.toml";

/// Environment override for the front-end executable.
pub const FRONT_END_ENV: &str = "EXHIBIT_FRONT_END";

/// Environment override for the back-end executable.
pub const BACK_END_ENV: &str = "EXHIBIT_BACK_END";

/// Complete configuration for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub toolchain: ToolchainConfig,
    pub output: OutputConfig,
}

/// Where source documents come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Directory scanned for documents.
    pub documents_dir: PathBuf,

    /// Only files whose name starts with this prefix participate.
    pub prefix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("inform7/extensions"),
            prefix: "Vorple".to_string(),
        }
    }
}

/// External compiler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Front-end executable (name searched in PATH, or a path).
    pub front_end: PathBuf,

    /// Back-end executable (name searched in PATH, or a path).
    pub back_end: PathBuf,

    pub rules_dir: PathBuf,
    pub extensions_dir: Option<PathBuf>,
    pub library_dir: PathBuf,
    pub story_format: String,
    pub back_end_flags: String,

    /// Per-stage timeout in seconds; 0 waits forever.
    pub timeout_secs: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let compiler = CompilerConfig::default();
        Self {
            front_end: PathBuf::from(DEFAULT_FRONT_END),
            back_end: PathBuf::from(DEFAULT_BACK_END),
            rules_dir: compiler.rules_dir,
            extensions_dir: compiler.extensions_dir,
            library_dir: compiler.library_dir,
            story_format: compiler.story_format,
            back_end_flags: compiler.back_end_flags,
            timeout_secs: compiler.timeout.map_or(0, |t| t.as_secs()),
        }
    }
}

/// Output locations and index settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Staging workspace root (wiped at the start of every run).
    pub workspace_dir: PathBuf,

    /// Destination root for artifacts, listings, and the index.
    pub destination: PathBuf,

    /// Index file name under the destination root.
    pub index_file: String,

    pub header_template: Option<PathBuf>,
    pub footer_template: Option<PathBuf>,

    /// Interpreter page used for play links.
    pub play_page: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("build/tmp/examples"),
            destination: PathBuf::from("build/release/examples"),
            index_file: "index.html".to_string(),
            header_template: None,
            footer_template: None,
            play_page: None,
        }
    }
}

impl PipelineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `path`, or `exhibit.toml` if present, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    tracing::debug!("Using {}", DEFAULT_CONFIG_FILE);
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply tool overrides from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(front_end) = std::env::var(FRONT_END_ENV) {
            self.toolchain.front_end = PathBuf::from(front_end);
        }
        if let Ok(back_end) = std::env::var(BACK_END_ENV) {
            self.toolchain.back_end = PathBuf::from(back_end);
        }
    }

    /// Make every relative path absolute against the current directory.
    ///
    /// Bare tool names are left alone so they are still searched in PATH.
    pub fn resolve_paths(&mut self) -> Result<()> {
        let absolute = |path: &mut PathBuf| -> Result<()> {
            if path.is_relative() {
                *path = std::path::absolute(&*path).map_err(|e| {
                    Error::Config(format!("cannot resolve {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        };

        for tool in [&mut self.toolchain.front_end, &mut self.toolchain.back_end] {
            if tool.components().count() > 1 {
                absolute(tool)?;
            }
        }

        absolute(&mut self.input.documents_dir)?;
        absolute(&mut self.toolchain.rules_dir)?;
        absolute(&mut self.toolchain.library_dir)?;
        absolute(&mut self.output.workspace_dir)?;
        absolute(&mut self.output.destination)?;

        for path in [
            self.toolchain.extensions_dir.as_mut(),
            self.output.header_template.as_mut(),
            self.output.footer_template.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            absolute(path)?;
        }

        Ok(())
    }

    /// Settings for the compilation pipeline.
    pub fn compiler_config(&self) -> CompilerConfig {
        let toolchain = &self.toolchain;
        CompilerConfig {
            rules_dir: toolchain.rules_dir.clone(),
            extensions_dir: toolchain.extensions_dir.clone(),
            library_dir: toolchain.library_dir.clone(),
            story_format: toolchain.story_format.clone(),
            back_end_flags: toolchain.back_end_flags.clone(),
            timeout: (toolchain.timeout_secs > 0)
                .then(|| Duration::from_secs(toolchain.timeout_secs)),
        }
    }

    /// Locate the configured tools.
    pub fn toolchain_manager(&self) -> Result<ToolchainManager> {
        ToolchainManager::with_tools(&self.toolchain.front_end, &self.toolchain.back_end)
    }

    /// Load the index template.
    pub fn index_template(&self) -> Result<IndexTemplate> {
        IndexTemplate::load(
            self.output.header_template.as_deref(),
            self.output.footer_template.as_deref(),
            self.output.play_page.clone(),
        )
    }

    /// Full path of the rendered index.
    pub fn index_path(&self) -> PathBuf {
        self.output.destination.join(&self.output.index_file)
    }
}
