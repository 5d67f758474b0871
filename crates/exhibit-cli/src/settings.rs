//! Configuration loading and command-line overrides.
//!
//! Precedence, lowest first: built-in defaults, the config file, the
//! `EXHIBIT_FRONT_END`/`EXHIBIT_BACK_END` environment, then flags.

use std::path::{Path, PathBuf};

use clap::Args;
use exhibit_core::PipelineConfig;

/// Flags that override configuration file values.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Directory containing the extension documents
    #[arg(long, value_name = "DIR")]
    pub documents: Option<PathBuf>,

    /// Only documents whose file name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Staging workspace directory (wiped on every run)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Destination for artifacts, listings, and the index
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Front-end compiler executable
    #[arg(long, value_name = "PATH")]
    pub front_end: Option<PathBuf>,

    /// Back-end compiler executable
    #[arg(long, value_name = "PATH")]
    pub back_end: Option<PathBuf>,

    /// Front-end rules directory
    #[arg(long, value_name = "DIR")]
    pub rules: Option<PathBuf>,

    /// Front-end extensions directory
    #[arg(long, value_name = "DIR")]
    pub extensions: Option<PathBuf>,

    /// Back-end library directory
    #[arg(long, value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Story format (e.g. z8)
    #[arg(long)]
    pub format: Option<String>,

    /// Per-stage timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Interpreter page for play links
    #[arg(long, value_name = "URL")]
    pub play_page: Option<String>,

    /// Index header template
    #[arg(long, value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// Index footer template
    #[arg(long, value_name = "FILE")]
    pub footer: Option<PathBuf>,
}

impl Overrides {
    /// Apply every flag that was given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut config.input.documents_dir, &self.documents);
        set(&mut config.input.prefix, &self.prefix);
        set(&mut config.output.workspace_dir, &self.workspace);
        set(&mut config.output.destination, &self.destination);
        set(&mut config.toolchain.front_end, &self.front_end);
        set(&mut config.toolchain.back_end, &self.back_end);
        set(&mut config.toolchain.rules_dir, &self.rules);
        set(&mut config.toolchain.library_dir, &self.library);
        set(&mut config.toolchain.story_format, &self.format);
        set(&mut config.toolchain.timeout_secs, &self.timeout);

        if self.extensions.is_some() {
            config.toolchain.extensions_dir = self.extensions.clone();
        }
        if self.play_page.is_some() {
            config.output.play_page = self.play_page.clone();
        }
        if self.header.is_some() {
            config.output.header_template = self.header.clone();
        }
        if self.footer.is_some() {
            config.output.footer_template = self.footer.clone();
        }
    }
}

/// Load the effective configuration.
pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> anyhow::Result<PipelineConfig> {
    let mut config = PipelineConfig::load_or_default(config_file)?;
    config.apply_env();
    overrides.apply(&mut config);
    config.resolve_paths()?;

    tracing::debug!("Effective configuration: {:?}", config);
    Ok(config)
}
