//! Source document discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// List the documents in `dir` whose file name starts with `prefix`.
///
/// Only regular files participate. The result is sorted by file name,
/// which fixes the processing order of a run.
///
/// # Errors
/// Returns [`Error::Config`] if the directory cannot be listed.
pub fn discover_documents(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::Config(format!(
            "cannot read documents directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(prefix));

        if matches_prefix && path.is_file() {
            documents.push(path);
        }
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(
        "Found {} documents with prefix '{}' in {}",
        documents.len(),
        prefix,
        dir.display()
    );

    Ok(documents)
}
