//! Core engine for the exhibit example pipeline.
//!
//! This crate provides:
//! - Example extraction from annotated documentation sources
//! - Staging workspace management for the external toolchain
//! - Two-stage compilation (front-end translation + back-end codegen)
//! - HTML index generation
//! - Run coordination with per-example failure isolation

pub mod compile;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod index;
pub mod workspace;

pub use compile::{
    CompilationPipeline, CompilationResult, CompilerConfig, Stage, StageDiagnostic,
    ToolchainManager,
};
pub use config::PipelineConfig;
pub use coordinator::{
    DocumentFailure, ExampleReport, Outcome, RunCallback, RunCoordinator, RunSummary,
    SilentCallback,
};
pub use error::{Error, Result};
pub use extract::{ExampleBlock, ExampleExtractor, SourceDocument, discover_documents};
pub use index::{IndexBuilder, IndexEntry, IndexTemplate};
pub use workspace::{StagedExample, StagingWorkspace};
