//! Clean command implementation for Exhibit CLI.

use std::fs;
use std::path::Path;

use anyhow::Context;
use exhibit_core::PipelineConfig;

use crate::colors;

/// Remove the staging workspace and the destination root.
pub fn execute(config: &PipelineConfig) -> anyhow::Result<()> {
    for dir in [&config.output.workspace_dir, &config.output.destination] {
        if remove(dir)? {
            println!("{} Removed {}", colors::mark(true), dir.display());
        } else {
            println!(
                "{}  Nothing at {}{}",
                colors::DIM,
                dir.display(),
                colors::RESET
            );
        }
    }
    Ok(())
}

fn remove(dir: &Path) -> anyhow::Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    Ok(true)
}
