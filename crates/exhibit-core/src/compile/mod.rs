//! Compilation pipeline for staged examples.
//!
//! This module provides:
//! - Toolchain discovery (front-end translator and back-end code generator)
//! - Bounded-wait process execution with output capture
//! - The two-stage pipeline that turns a staged example into a story file
//!
//! # Architecture
//!
//! ```text
//! Source/story.ni ──► front-end (ni) ──► Build/auto.inf ──► back-end (inform6) ──► <title>.z8
//!                        │                                     │
//!                        └── stdout+stderr on failure          └── stderr on failure
//! ```

mod pipeline;
mod process;
mod toolchain;
mod types;

pub use pipeline::CompilationPipeline;
pub use process::{Capture, ProcessOutput, run_process};
pub use toolchain::{DEFAULT_BACK_END, DEFAULT_FRONT_END, ToolchainManager};
pub use types::{CompilationResult, CompilerConfig, Stage, StageDiagnostic};
