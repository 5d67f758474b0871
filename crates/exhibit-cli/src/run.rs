//! Run command implementation for Exhibit CLI.
//!
//! Extracts every example from the configured documents, compiles each
//! one, and writes the index.

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use exhibit_core::{PipelineConfig, RunCoordinator, discover_documents};

use crate::colors;
use crate::progress::{ProgressCallback, print_failures};

/// Exit status when the run finished but something failed.
const EXIT_FAILURES: u8 = 2;

/// Execute a full run.
pub fn execute(config: &PipelineConfig, report: Option<&Path>) -> anyhow::Result<ExitCode> {
    let start = Instant::now();

    let documents = discover_documents(&config.input.documents_dir, &config.input.prefix)?;
    let mut coordinator = RunCoordinator::from_config(config)?;

    println!(
        "{}Building{} examples from {} documents in {}",
        colors::GREEN,
        colors::RESET,
        documents.len(),
        config.input.documents_dir.display()
    );

    if documents.is_empty() {
        println!(
            "{}No documents start with \"{}\".{}",
            colors::YELLOW,
            config.input.prefix,
            colors::RESET
        );
    }

    let summary = coordinator.run(&documents, &ProgressCallback::new())?;

    print_failures(&summary);

    if let Some(path) = report {
        let json = summary.to_json().context("Failed to serialize run report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    println!("\n{}", "─".repeat(50));
    let failed = summary.examples.len() - summary.compiled_count();
    let color = if summary.has_failures() {
        colors::YELLOW
    } else {
        colors::GREEN
    };
    println!(
        "{}Compiled{} {} of {} examples ({} failed) in {:.2}s",
        color,
        colors::RESET,
        summary.compiled_count(),
        summary.examples.len(),
        failed,
        start.elapsed().as_secs_f64()
    );
    if !summary.document_failures.is_empty() {
        println!(
            "{}Skipped{} {} unreadable documents",
            colors::RED,
            colors::RESET,
            summary.document_failures.len()
        );
    }
    println!("Index: {}", summary.index_path.display());

    if summary.has_failures() {
        Ok(ExitCode::from(EXIT_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
