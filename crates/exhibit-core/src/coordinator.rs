//! Run coordination: extraction → staging → compilation → indexing.
//!
//! Documents are processed in the given order and examples in extraction
//! order, strictly one at a time, because every example shares the same
//! staging workspace. A failure is contained at the smallest scope that
//! produced it: an unreadable document skips that document, a compiler
//! failure marks that example. Only workspace, configuration, and
//! missing-tool errors abort the run, and an aborted run removes the
//! output it had written.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::compile::{CompilationPipeline, CompilationResult};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::extract::{ExampleBlock, ExampleExtractor, SourceDocument};
use crate::index::{IndexBuilder, IndexEntry, IndexTemplate};
use crate::workspace::StagingWorkspace;

/// Callback trait for run progress reporting.
pub trait RunCallback {
    /// Called when a document has been read and its examples extracted.
    fn on_document_started(&self, _document: &str, _example_count: usize) {}

    /// Called when a document cannot be read.
    fn on_document_failed(&self, _failure: &DocumentFailure) {}

    /// Called before an example is staged.
    fn on_example_started(&self, _document: &str, _title: &str) {}

    /// Called once an example has an outcome.
    fn on_example_finished(&self, _report: &ExampleReport) {}
}

/// Callback that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCallback;

impl RunCallback for SilentCallback {}

/// Per-example outcome tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Compiled,
    FrontEndFailed,
    BackEndFailed,
    /// Staging or output preparation failed before a verdict.
    Errored,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Self::Compiled
    }

    /// Stage label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Compiled => "compiled",
            Self::FrontEndFailed => "front-end",
            Self::BackEndFailed => "back-end",
            Self::Errored => "staging",
        }
    }
}

/// What happened to one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    /// Source document identifier.
    pub document: String,
    pub title: String,
    /// Header line in the source document.
    pub line: usize,
    pub outcome: Outcome,
    /// Captured compiler output or error text.
    pub diagnostic: Option<String>,
    /// Compiled artifact, on success.
    pub artifact: Option<PathBuf>,
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub document: String,
    pub path: PathBuf,
    pub message: String,
}

/// Result of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Every extracted example, in processing order.
    pub examples: Vec<ExampleReport>,
    pub document_failures: Vec<DocumentFailure>,
    /// Where the index was written.
    pub index_path: PathBuf,
}

impl RunSummary {
    /// Number of examples that compiled.
    pub fn compiled_count(&self) -> usize {
        self.examples.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Examples that did not compile.
    pub fn failures(&self) -> impl Iterator<Item = &ExampleReport> {
        self.examples.iter().filter(|r| !r.outcome.is_success())
    }

    /// Whether any example or document failed.
    pub fn has_failures(&self) -> bool {
        !self.document_failures.is_empty() || self.failures().next().is_some()
    }

    /// Render the summary as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Orchestrates a full run over a set of documents.
pub struct RunCoordinator {
    extractor: ExampleExtractor,
    workspace: StagingWorkspace,
    pipeline: CompilationPipeline,
    index: IndexBuilder,
    /// Destination root for artifacts, listings, and the index
    destination: PathBuf,
    /// Index file name under the destination root
    index_file: String,
}

impl RunCoordinator {
    /// Create a coordinator from its parts.
    pub fn new(
        workspace: StagingWorkspace,
        pipeline: CompilationPipeline,
        template: IndexTemplate,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor: ExampleExtractor::new(),
            workspace,
            pipeline,
            index: IndexBuilder::new(template),
            destination: destination.into(),
            index_file: "index.html".to_string(),
        }
    }

    /// Create a coordinator from configuration.
    ///
    /// Locates the toolchain and loads the index template, so a missing
    /// compiler or template fails here, before anything is extracted.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let toolchain = config.toolchain_manager()?;
        let template = config.index_template()?;
        let pipeline = CompilationPipeline::new(config.compiler_config(), toolchain);
        let workspace = StagingWorkspace::new(&config.output.workspace_dir);

        let mut coordinator =
            Self::new(workspace, pipeline, template, &config.output.destination);
        coordinator.index_file = config.output.index_file.clone();
        Ok(coordinator)
    }

    /// Override the index file name.
    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    /// The index accumulated by the last run.
    pub fn index(&self) -> &IndexBuilder {
        &self.index
    }

    /// Path the index is written to.
    pub fn index_path(&self) -> PathBuf {
        self.destination.join(&self.index_file)
    }

    /// Process every document and write the index.
    ///
    /// # Errors
    /// Returns an error only for conditions that abort the whole run: the
    /// workspace cannot be reset, a compiler cannot be started, or the
    /// index cannot be written.
    pub fn run(&mut self, documents: &[PathBuf], callback: &dyn RunCallback) -> Result<RunSummary> {
        self.workspace.reset()?;
        self.index.clear();

        let mut outputs = RunOutputs::default();
        match self.run_documents(documents, callback, &mut outputs) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::warn!("Run aborted, discarding its output: {}", e);
                outputs.discard();
                Err(e)
            }
        }
    }

    fn run_documents(
        &mut self,
        documents: &[PathBuf],
        callback: &dyn RunCallback,
        outputs: &mut RunOutputs,
    ) -> Result<RunSummary> {
        outputs.ensure_dir(&self.destination)?;

        let mut summary = RunSummary {
            index_path: self.index_path(),
            ..Default::default()
        };

        for path in documents {
            let document = match SourceDocument::read(path) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping document {}: {}", path.display(), e);
                    let failure = DocumentFailure {
                        document: SourceDocument::id_for(path),
                        path: path.clone(),
                        message: e.to_string(),
                    };
                    callback.on_document_failed(&failure);
                    summary.document_failures.push(failure);
                    continue;
                }
            };

            self.process_document(&document, callback, &mut summary, outputs)?;
        }

        outputs.commit()?;
        self.index.write_to(&summary.index_path)?;
        tracing::info!(
            "Compiled {}/{} examples, index at {}",
            summary.compiled_count(),
            summary.examples.len(),
            summary.index_path.display()
        );

        Ok(summary)
    }

    /// Compile a single story file into `target`, outside of any run.
    ///
    /// The workspace is reset first; no listing or index is written.
    pub fn compile_story(&mut self, source: &Path, target: &Path) -> Result<CompilationResult> {
        let text = fs::read_to_string(source).map_err(|e| Error::Document {
            path: source.to_path_buf(),
            source: e,
        })?;

        self.workspace.reset()?;
        let label = SourceDocument::id_for(source);
        let staged = self.workspace.stage_source(label, &text)?;
        self.pipeline.compile(&staged, target)
    }

    fn process_document(
        &mut self,
        document: &SourceDocument,
        callback: &dyn RunCallback,
        summary: &mut RunSummary,
        outputs: &mut RunOutputs,
    ) -> Result<()> {
        let blocks = self.extractor.extract(document);
        tracing::info!("{}: {} examples", document.id, blocks.len());
        callback.on_document_started(&document.id, blocks.len());

        let mut used_stems = HashSet::new();
        for block in &blocks {
            callback.on_example_started(&document.id, &block.title);

            let stem = unique_stem(block.file_stem(), &mut used_stems);
            let listing_href = format!("{}/{}.txt", document.id, stem);
            let artifact_href = format!(
                "{}/{}.{}",
                document.id,
                stem,
                self.pipeline.config().story_format
            );

            let artifact = self.destination.join(&artifact_href);
            let result = self.compile_example(block, &artifact, outputs);

            let (outcome, diagnostic, artifact) = match result {
                Ok(CompilationResult::Success(path)) => {
                    outputs.artifacts.push(path.clone());
                    (Outcome::Compiled, None, Some(path))
                }
                Ok(CompilationResult::FrontEndFailure(diagnostic)) => {
                    outputs.stale.push(artifact);
                    (Outcome::FrontEndFailed, Some(diagnostic.to_string()), None)
                }
                Ok(CompilationResult::BackEndFailure(diagnostic)) => {
                    outputs.stale.push(artifact);
                    (Outcome::BackEndFailed, Some(diagnostic.to_string()), None)
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{}/{}: {}", document.id, block.title, e);
                    outputs.stale.push(artifact);
                    (Outcome::Errored, Some(e.to_string()), None)
                }
            };

            let mut source = block.source();
            source.push('\n');
            outputs
                .listings
                .push((self.destination.join(&listing_href), source));

            self.index.append(IndexEntry {
                document: document.id.clone(),
                title: block.title.clone(),
                difficulty: block.difficulty,
                description: block.description.clone(),
                test_command: block.test_command.clone(),
                artifact: outcome.is_success().then_some(artifact_href),
                listing: listing_href,
            });

            let report = ExampleReport {
                document: document.id.clone(),
                title: block.title.clone(),
                line: block.line,
                outcome,
                diagnostic,
                artifact,
            };
            callback.on_example_finished(&report);
            summary.examples.push(report);
        }

        Ok(())
    }

    /// Stage the example and run both compiler stages.
    fn compile_example(
        &mut self,
        block: &ExampleBlock,
        artifact: &Path,
        outputs: &mut RunOutputs,
    ) -> Result<CompilationResult> {
        if let Some(dir) = artifact.parent() {
            outputs.ensure_dir(dir)?;
        }

        let staged = self.workspace.stage(block)?;
        self.pipeline.compile(&staged, artifact)
    }
}

/// Give a repeated stem a ` (n)` suffix, starting at 2.
///
/// Stems are compared after sanitizing, so distinct titles that map to
/// the same file name are separated too.
fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{stem} ({n})");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Output written (or pending) during one run.
///
/// Listings are held back until every document has been processed. A
/// fatal error discards the artifacts and directories the run created.
#[derive(Debug, Default)]
struct RunOutputs {
    /// Directories created by this run, outermost first
    created_dirs: Vec<PathBuf>,
    /// Artifacts compiled by this run
    artifacts: Vec<PathBuf>,
    /// Artifact paths of examples that did not compile
    stale: Vec<PathBuf>,
    /// Listings to write on commit
    listings: Vec<(PathBuf, String)>,
}

impl RunOutputs {
    fn ensure_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            self.created_dirs.push(dir.to_path_buf());
        }
        Ok(())
    }

    /// Write the listings and drop artifacts left by earlier runs for
    /// examples that failed this time.
    fn commit(&mut self) -> Result<()> {
        for stale in &self.stale {
            if stale.exists() {
                fs::remove_file(stale)?;
            }
        }

        for (path, source) in self.listings.drain(..) {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&path, source)?;
        }
        Ok(())
    }

    fn discard(self) {
        for artifact in &self.artifacts {
            if let Err(e) = fs::remove_file(artifact) {
                tracing::debug!("Failed to remove {}: {}", artifact.display(), e);
            }
        }
        for dir in self.created_dirs.iter().rev() {
            if let Err(e) = fs::remove_dir_all(dir) {
                tracing::debug!("Failed to remove {}: {}", dir.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::FrontEndFailed.label(), "front-end");
        assert_eq!(Outcome::BackEndFailed.label(), "back-end");
        assert!(Outcome::Compiled.is_success());
        assert!(!Outcome::Errored.is_success());
    }

    #[test]
    fn test_summary_counts() {
        let report = |title: &str, outcome| ExampleReport {
            document: "Vorple".to_string(),
            title: title.to_string(),
            line: 1,
            outcome,
            diagnostic: None,
            artifact: None,
        };

        let summary = RunSummary {
            examples: vec![
                report("A", Outcome::Compiled),
                report("B", Outcome::FrontEndFailed),
            ],
            ..Default::default()
        };

        assert_eq!(summary.compiled_count(), 1);
        assert!(summary.has_failures());
        assert_eq!(summary.failures().next().unwrap().title, "B");

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"front-end-failed\""));
    }

    #[test]
    fn test_unique_stem_suffixes_repeats() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("Same".to_string(), &mut used), "Same");
        assert_eq!(unique_stem("Same".to_string(), &mut used), "Same (2)");
        assert_eq!(unique_stem("Same".to_string(), &mut used), "Same (3)");
        assert_eq!(unique_stem("Other".to_string(), &mut used), "Other");
    }

    #[test]
    fn test_unique_stem_skips_taken_suffix() {
        let mut used = HashSet::new();
        unique_stem("A (2)".to_string(), &mut used);
        unique_stem("A".to_string(), &mut used);
        assert_eq!(unique_stem("A".to_string(), &mut used), "A (3)");
    }

    #[test]
    fn test_empty_summary_has_no_failures() {
        assert!(!RunSummary::default().has_failures());
    }
}
