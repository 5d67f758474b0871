//! Terminal progress reporting for runs.

use exhibit_core::{DocumentFailure, ExampleReport, Outcome, RunCallback, RunSummary};

use crate::colors;

/// Progress callback that prints run status to the terminal.
#[derive(Debug, Default)]
pub struct ProgressCallback;

impl ProgressCallback {
    pub fn new() -> Self {
        Self
    }
}

impl RunCallback for ProgressCallback {
    fn on_document_started(&self, document: &str, example_count: usize) {
        println!(
            "\n{}{}{} {}({} examples){}",
            colors::BOLD,
            document,
            colors::RESET,
            colors::DIM,
            example_count,
            colors::RESET
        );
    }

    fn on_document_failed(&self, failure: &DocumentFailure) {
        println!(
            "\n{}{}{} {}",
            colors::BOLD,
            failure.document,
            colors::RESET,
            colors::mark(false)
        );
    }

    fn on_example_started(&self, _document: &str, title: &str) {
        let label = colors::paint(colors::CYAN, "  ▶ Compiling");
        colors::print_pending(&format!("{label} {title}... "));
    }

    fn on_example_finished(&self, report: &ExampleReport) {
        match report.outcome {
            Outcome::Compiled => println!("{}", colors::mark(true)),
            outcome => println!(
                "{} {}({}){}",
                colors::mark(false),
                colors::DIM,
                outcome.label(),
                colors::RESET
            ),
        }
    }
}

/// Print the diagnostics of every failed example and document.
pub fn print_failures(summary: &RunSummary) {
    for failure in &summary.document_failures {
        println!(
            "\n{}[{}]{} document failed:\n{}",
            colors::RED,
            failure.document,
            colors::RESET,
            failure.message
        );
    }

    for report in summary.failures() {
        println!("\n{}", failure_heading(report));
        if let Some(diagnostic) = &report.diagnostic {
            println!("{}", diagnostic.trim_end());
        }
    }
}

/// `[<document>/<title>] <stage> failed:`
pub fn failure_heading(report: &ExampleReport) -> String {
    format!(
        "[{}/{}] {} failed:",
        report.document,
        report.title,
        report.outcome.label()
    )
}
