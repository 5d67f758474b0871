//! Common types for the compilation pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Configuration for the two compiler stages.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Rules library handed to the front-end (`-rules`).
    pub rules_dir: PathBuf,

    /// Extra extensions directory for the front-end (`-extensions`).
    pub extensions_dir: Option<PathBuf>,

    /// Runtime library include path for the back-end (`+path`).
    pub library_dir: PathBuf,

    /// Target story format (`z8`, `z5`, `ulx`).
    pub story_format: String,

    /// Option flags for the back-end.
    pub back_end_flags: String,

    /// Maximum wall time per stage; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from(
                "/Applications/Inform.app/Contents/Resources/Inform7/Extensions",
            ),
            extensions_dir: None,
            library_dir: PathBuf::from("/Applications/Inform.app/Contents/Resources/Library/6.11"),
            story_format: "z8".to_string(),
            back_end_flags: "-kE2SDwv8".to_string(),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

impl CompilerConfig {
    /// Front-end argument selecting the story format.
    pub fn format_flag(&self) -> String {
        format!("-extension={}", self.story_format)
    }

    /// Back-end argument adding the runtime library to the include path.
    pub fn library_flag(&self) -> String {
        format!("+{}", self.library_dir.display())
    }
}

/// Compiler stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    FrontEnd,
    BackEnd,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontEnd => write!(f, "front-end"),
            Self::BackEnd => write!(f, "back-end"),
        }
    }
}

/// Captured output of a failed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDiagnostic {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,

    /// Whether the stage was killed for exceeding its timeout.
    pub timed_out: bool,

    /// Captured output.
    pub output: String,
}

impl fmt::Display for StageDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            writeln!(f, "(killed after exceeding the stage timeout)")?;
        } else if let Some(code) = self.exit_code {
            writeln!(f, "(exit code {code})")?;
        } else {
            writeln!(f, "(terminated by signal)")?;
        }
        write!(f, "{}", self.output.trim_end())
    }
}

/// Result of compiling one staged example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
    /// Both stages succeeded; the artifact is at this path.
    Success(PathBuf),

    /// The front-end rejected the source; the back-end was not run.
    FrontEndFailure(StageDiagnostic),

    /// The back-end failed on the intermediate artifact.
    BackEndFailure(StageDiagnostic),
}

impl CompilationResult {
    /// Returns true if both stages succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The artifact path, if compilation succeeded.
    pub fn artifact(&self) -> Option<&PathBuf> {
        match self {
            Self::Success(path) => Some(path),
            Self::FrontEndFailure(_) | Self::BackEndFailure(_) => None,
        }
    }

    /// The failing stage and its diagnostic, if compilation failed.
    pub fn failure(&self) -> Option<(Stage, &StageDiagnostic)> {
        match self {
            Self::Success(_) => None,
            Self::FrontEndFailure(diagnostic) => Some((Stage::FrontEnd, diagnostic)),
            Self::BackEndFailure(diagnostic) => Some((Stage::BackEnd, diagnostic)),
        }
    }
}
