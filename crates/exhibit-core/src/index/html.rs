//! HTML templates and escaping for the example index.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Built-in page header.
pub const DEFAULT_HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Examples</title>
<style>
body { font-family: sans-serif; max-width: 50em; margin: 2em auto; line-height: 1.4; }
.example { margin-bottom: 0.8em; }
.difficulty { color: #c90; }
.description { color: #555; }
.test-command { display: block; font-size: 0.9em; color: #555; }
.links a { margin-right: 1em; }
</style>
</head>
<body>
<h1>Examples</h1>
"#;

/// Built-in page footer.
pub const DEFAULT_FOOTER: &str = "</body>\n</html>\n";

/// Header, footer, and link settings for the rendered index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTemplate {
    /// Markup placed before the generated sections.
    pub header: String,

    /// Markup placed after the generated sections.
    pub footer: String,

    /// Interpreter page for play links (`<page>?story=<artifact>`).
    /// When unset, play links point at the artifact itself.
    pub play_page: Option<String>,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            play_page: None,
        }
    }
}

impl IndexTemplate {
    /// Load header/footer files, falling back to the built-in markup.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a given template file cannot be read.
    pub fn load(
        header: Option<&Path>,
        footer: Option<&Path>,
        play_page: Option<String>,
    ) -> Result<Self> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|e| {
                Error::Config(format!(
                    "cannot read index template {}: {}",
                    path.display(),
                    e
                ))
            })
        };

        Ok(Self {
            header: header.map(read).transpose()?.unwrap_or_else(|| DEFAULT_HEADER.to_string()),
            footer: footer.map(read).transpose()?.unwrap_or_else(|| DEFAULT_FOOTER.to_string()),
            play_page,
        })
    }

    /// Play link target for an artifact href.
    pub fn play_href(&self, artifact: &str) -> String {
        match &self.play_page {
            Some(page) => format!("{}?story={}", page, artifact),
            None => artifact.to_string(),
        }
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a relative link, keeping `/` separators.
pub(crate) fn encode_href(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
