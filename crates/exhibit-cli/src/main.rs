//! Exhibit CLI - compile and index the examples embedded in extension documents.

mod clean;
mod colors;
mod extract;
mod progress;
mod run;
mod settings;
mod story;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::settings::Overrides;

#[derive(Parser)]
#[command(name = "exhibit")]
#[command(about = "Compile and index the examples embedded in extension documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./exhibit.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, compile, and index every example
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Compile a single story file
    Story {
        /// Path to the story source
        file: PathBuf,

        /// Output path (default: the source name with the story format extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// List the examples a document yields, without compiling
    Extract {
        /// Path to the document
        file: PathBuf,

        /// Print the examples as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the staging workspace and the destination
    Clean {
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format exhibit-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<exhibit_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let config = cli.config.as_deref();

    let code = match cli.command {
        Commands::Run { overrides, report } => {
            let settings = settings::load(config, &overrides).map_err(format_error)?;
            run::execute(&settings, report.as_deref()).map_err(format_error)?
        }

        Commands::Story {
            file,
            output,
            overrides,
        } => {
            let settings = settings::load(config, &overrides).map_err(format_error)?;
            story::execute(&settings, &file, output.as_deref()).map_err(format_error)?;
            ExitCode::SUCCESS
        }

        Commands::Extract { file, json } => {
            extract::execute(&file, json).map_err(format_error)?;
            ExitCode::SUCCESS
        }

        Commands::Clean { overrides } => {
            let settings = settings::load(config, &overrides).map_err(format_error)?;
            clean::execute(&settings).map_err(format_error)?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
