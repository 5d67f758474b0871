//! Story command implementation for Exhibit CLI.
//!
//! Compiles one standalone story through the same staging workspace and
//! two-stage pipeline a run uses.

use std::path::{Path, PathBuf};

use exhibit_core::{CompilationResult, PipelineConfig, RunCoordinator};

use crate::colors;

/// Compile `file` into `output`.
pub fn execute(config: &PipelineConfig, file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(file, &config.toolchain.story_format),
    };

    println!(
        "{}Compiling{} {}",
        colors::GREEN,
        colors::RESET,
        file.display()
    );

    let mut coordinator = RunCoordinator::from_config(config)?;
    match coordinator.compile_story(file, &output)? {
        CompilationResult::Success(artifact) => {
            println!("{} {}", colors::mark(true), artifact.display());
            Ok(())
        }
        result => {
            if let Some((stage, diagnostic)) = result.failure() {
                println!("{} {} failed:", colors::mark(false), stage);
                println!("{}", diagnostic);
            }
            anyhow::bail!("Failed to compile {}", file.display())
        }
    }
}

fn default_output(file: &Path, format: &str) -> PathBuf {
    let name = file.file_name().map(PathBuf::from).unwrap_or_default();
    name.with_extension(format)
}
