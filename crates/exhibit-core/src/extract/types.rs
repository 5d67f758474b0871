//! Types shared by the extraction stage.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// A documentation source read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File name without its extension (e.g. `Vorple Hyperlinks`).
    pub id: String,

    /// Where the document was read from, if it came from disk.
    pub path: Option<PathBuf>,

    /// Raw text lines, line terminators removed.
    pub lines: Vec<String>,
}

impl SourceDocument {
    /// Build a document from in-memory text.
    pub fn from_text(id: impl Into<String>, text: &str) -> Self {
        Self {
            id: id.into(),
            path: None,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Read a document from disk.
    ///
    /// # Errors
    /// Returns [`Error::Document`] if the file cannot be read or is not UTF-8.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Document {
            path: path.to_path_buf(),
            source,
        })?;

        let mut document = Self::from_text(Self::id_for(path), &text);
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Document identifier for a path: the file name minus its extension.
    pub fn id_for(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// An example program embedded in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleBlock {
    /// Title from the header line (may be empty).
    pub title: String,

    /// Number of difficulty markers (stars) on the header line.
    pub difficulty: usize,

    /// Text after the first `" - "` separator on the header line.
    pub description: Option<String>,

    /// Commands from a `Test me with "..."` line, if any.
    pub test_command: Option<String>,

    /// De-indented body lines in document order.
    pub body: Vec<String>,

    /// 1-based line number of the header.
    pub line: usize,
}

impl ExampleBlock {
    /// Body lines joined into the program source.
    pub fn source(&self) -> String {
        self.body.join("\n")
    }

    /// Whether the body holds any non-blank line.
    pub fn has_content(&self) -> bool {
        self.body.iter().any(|line| !line.trim().is_empty())
    }

    /// File-name-safe stem derived from the title.
    ///
    /// Path separators and characters that are invalid in file names on
    /// common platforms become `_`; an empty title becomes `untitled`.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        // A stem of only dots would escape the document directory.
        if stem.trim_matches('.').is_empty() {
            "untitled".to_string()
        } else {
            stem
        }
    }
}
