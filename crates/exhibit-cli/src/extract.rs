//! Extract command implementation for Exhibit CLI.
//!
//! Lists the examples a document yields without touching the toolchain.

use std::path::Path;

use anyhow::Context;
use exhibit_core::{ExampleBlock, ExampleExtractor, SourceDocument};

use crate::colors;

/// List the examples of `file`.
pub fn execute(file: &Path, json: bool) -> anyhow::Result<()> {
    let document = SourceDocument::read(file)?;
    let examples = ExampleExtractor::new().extract(&document);

    if json {
        let output =
            serde_json::to_string_pretty(&examples).context("Failed to serialize examples")?;
        println!("{output}");
        return Ok(());
    }

    println!(
        "{}{}{} {}({} examples){}",
        colors::BOLD,
        document.id,
        colors::RESET,
        colors::DIM,
        examples.len(),
        colors::RESET
    );

    if examples.is_empty() {
        println!(
            "\n{}No examples found in document.{}",
            colors::YELLOW,
            colors::RESET
        );
        println!("Examples start with a line beginning \"Example:\"");
        return Ok(());
    }

    for example in &examples {
        print_example(example);
    }

    Ok(())
}

fn print_example(example: &ExampleBlock) {
    let stars = "*".repeat(example.difficulty);
    println!(
        "\n  {}{}{} {} {}(line {}, {} lines){}",
        colors::YELLOW,
        stars,
        colors::RESET,
        example.title,
        colors::DIM,
        example.line,
        example.body.len(),
        colors::RESET
    );
    if let Some(description) = &example.description {
        println!("    {description}");
    }
    if let Some(command) = &example.test_command {
        println!("    {}test me:{} {}", colors::CYAN, colors::RESET, command);
    }
}
