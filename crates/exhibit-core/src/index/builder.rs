//! Index accumulation and rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

use super::html::{IndexTemplate, encode_href, html_escape};

/// One example's row in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Source document identifier.
    pub document: String,

    /// Example title.
    pub title: String,

    /// Difficulty marker count.
    pub difficulty: usize,

    /// Header description.
    pub description: Option<String>,

    /// Commands from the example's test annotation.
    pub test_command: Option<String>,

    /// Artifact link relative to the index, present only on success.
    pub artifact: Option<String>,

    /// Source listing link relative to the index.
    pub listing: String,
}

/// Accumulates entries and renders the index page.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    template: IndexTemplate,
    entries: Vec<IndexEntry>,
}

impl IndexBuilder {
    /// Create an empty index with the given template.
    pub fn new(template: IndexTemplate) -> Self {
        Self {
            template,
            entries: Vec::new(),
        }
    }

    /// Append an entry. Entries keep call order.
    pub fn append(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Drop all entries, keeping the template.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the full page.
    ///
    /// Consecutive entries from the same document share one section.
    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str(&self.template.header);

        let mut current: Option<&str> = None;
        for entry in &self.entries {
            if current != Some(entry.document.as_str()) {
                if current.is_some() {
                    html.push_str("</ul>\n</section>\n");
                }
                let _ = writeln!(
                    html,
                    "<section class=\"document\">\n<h2>{}</h2>\n<ul class=\"examples\">",
                    html_escape(&entry.document)
                );
                current = Some(entry.document.as_str());
            }
            self.render_entry(&mut html, entry);
        }

        if current.is_some() {
            html.push_str("</ul>\n</section>\n");
        }

        html.push_str(&self.template.footer);
        html
    }

    /// Render and write the page to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        Ok(())
    }

    fn render_entry(&self, html: &mut String, entry: &IndexEntry) {
        html.push_str("<li class=\"example\">\n");

        if entry.difficulty > 0 {
            let _ = writeln!(
                html,
                "<span class=\"difficulty\" title=\"difficulty {}\">{}</span>",
                entry.difficulty,
                "\u{2605}".repeat(entry.difficulty)
            );
        }

        let _ = writeln!(
            html,
            "<span class=\"title\">{}</span>",
            html_escape(&entry.title)
        );

        if let Some(description) = &entry.description {
            let _ = writeln!(
                html,
                "<span class=\"description\">{}</span>",
                html_escape(description)
            );
        }

        if let Some(command) = &entry.test_command {
            let _ = writeln!(
                html,
                "<span class=\"test-command\">Type <kbd>test me</kbd> to try: <code>{}</code></span>",
                html_escape(command)
            );
        }

        html.push_str("<span class=\"links\">");
        if let Some(artifact) = &entry.artifact {
            let href = self.template.play_href(&encode_href(artifact));
            let _ = write!(
                html,
                "<a class=\"play\" href=\"{}\">Play</a>",
                html_escape(&href)
            );
        }
        let _ = write!(
            html,
            "<a class=\"source\" href=\"{}\">View source</a>",
            html_escape(&encode_href(&entry.listing))
        );
        html.push_str("</span>\n</li>\n");
    }
}
