//! Two-stage compilation of a staged example.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::workspace::StagedExample;

use super::process::{Capture, ProcessOutput, run_process};
use super::toolchain::ToolchainManager;
use super::types::{CompilationResult, CompilerConfig, Stage, StageDiagnostic};

/// Drives the front-end and back-end compilers for one example at a time.
pub struct CompilationPipeline {
    /// Compiler configuration
    config: CompilerConfig,

    /// Resolved tool paths
    toolchain: ToolchainManager,
}

impl CompilationPipeline {
    /// Create a new pipeline.
    pub fn new(config: CompilerConfig, toolchain: ToolchainManager) -> Self {
        Self { config, toolchain }
    }

    /// Get the compiler configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the staged example into `target`.
    ///
    /// Compiler failures are returned as [`CompilationResult`] variants.
    /// No stage is retried.
    ///
    /// # Errors
    /// Returns [`Error::MissingTool`] if a compiler cannot be started, and
    /// an IO error if `target` cannot be prepared.
    pub fn compile(&self, staged: &StagedExample<'_>, target: &Path) -> Result<CompilationResult> {
        let start = Instant::now();

        // The back-end runs inside the workspace, so the output path must not
        // depend on our working directory.
        let target = std::path::absolute(target)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let front = self.run_stage(Stage::FrontEnd, &mut self.front_end_command(staged))?;
        if !front.success {
            tracing::warn!("Front-end failed for '{}'", staged.label());
            return Ok(CompilationResult::FrontEndFailure(Self::diagnostic(front)));
        }

        let back = self.run_stage(Stage::BackEnd, &mut self.back_end_command(staged, &target))?;
        if !back.stdout.is_empty() {
            tracing::trace!("Back-end output for '{}':\n{}", staged.label(), back.stdout);
        }
        if !back.success {
            tracing::warn!("Back-end failed for '{}'", staged.label());
            return Ok(CompilationResult::BackEndFailure(Self::diagnostic(back)));
        }

        tracing::debug!(
            "Compiled '{}' in {}ms",
            staged.label(),
            start.elapsed().as_millis()
        );
        Ok(CompilationResult::Success(target))
    }

    /// Build the front-end command for a staged example.
    fn front_end_command(&self, staged: &StagedExample<'_>) -> Command {
        let mut cmd = Command::new(self.toolchain.front_end());
        cmd.current_dir(staged.root())
            .arg("-package")
            .arg(".")
            .arg("-rules")
            .arg(&self.config.rules_dir);

        if let Some(extensions) = &self.config.extensions_dir {
            cmd.arg("-extensions").arg(extensions);
        }

        cmd.arg(self.config.format_flag());
        cmd
    }

    /// Build the back-end command reading the front-end's intermediate.
    fn back_end_command(&self, staged: &StagedExample<'_>, target: &Path) -> Command {
        let mut cmd = Command::new(self.toolchain.back_end());
        cmd.current_dir(staged.root())
            .arg(staged.relative_intermediate())
            .arg(self.config.library_flag())
            .arg(&self.config.back_end_flags)
            .arg("-o")
            .arg(target);
        cmd
    }

    fn run_stage(&self, stage: Stage, cmd: &mut Command) -> Result<ProcessOutput> {
        let capture = match stage {
            Stage::FrontEnd => Capture::Combined,
            Stage::BackEnd => Capture::StderrOnly,
        };

        tracing::debug!("Running {} stage: {:?}", stage, cmd);

        run_process(cmd, capture, self.config.timeout).map_err(|e| {
            let tool = match stage {
                Stage::FrontEnd => self.toolchain.front_end(),
                Stage::BackEnd => self.toolchain.back_end(),
            };
            Error::MissingTool {
                tool: tool.display().to_string(),
                message: format!("failed to start {stage} compiler: {e}"),
            }
        })
    }

    fn diagnostic(output: ProcessOutput) -> StageDiagnostic {
        StageDiagnostic {
            exit_code: output.exit_code,
            timed_out: output.timed_out,
            output: output.captured,
        }
    }
}
