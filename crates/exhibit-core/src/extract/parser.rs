//! Line-oriented example parser.
//!
//! The scanner is a two-state machine over document lines:
//!
//! ```text
//!            header                      header
//! Seeking ───────────► InBody ◄──────────────────── Seeking
//!    ▲                  │  ▲                            ▲
//!    │                  │  └── blank / indented line ───┘ (append)
//!    │                  │
//!    └── other line ────┘  (block stays open, collection stops)
//! ```
//!
//! A block is closed only by the next header or by end-of-document.
//! Blocks without any non-blank body line are dropped.

use std::iter::Enumerate;
use std::slice;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ExampleBlock, SourceDocument};

/// `Example:` followed by optional difficulty stars and the title text.
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Example:\s*(\**)(.*)$").expect("Invalid regex pattern for example header")
});

/// Indented `Test me with "..."` annotation; group 1 holds the commands.
static TEST_COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\tTest me with "([^"]*)""#).expect("Invalid regex pattern for test command")
});

/// Single indentation token that marks a body line.
const INDENT: char = '\t';

/// Inline annotation that may directly follow the indentation.
const ANNOTATION_PREFIX: &str = "*:";

/// Separator between title and description on a header line.
const DESCRIPTION_SEPARATOR: &str = " - ";

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Not collecting body lines.
    Seeking,
    /// Appending body lines to the open block.
    InBody,
}

/// Parsed `Example:` header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    difficulty: usize,
    title: String,
    description: Option<String>,
}

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Header(Header),
    Body {
        text: &'a str,
        test_command: Option<&'a str>,
    },
    Other,
}

/// What the scanner should do with a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Close the open block (if any) and open a new one.
    Open,
    /// Append to the open block.
    Append,
    /// Stop collecting; the block stays open.
    Stop,
    Ignore,
}

impl ScanState {
    /// Pure transition function.
    fn step(self, line: &Line<'_>) -> (ScanState, Action) {
        match (self, line) {
            (_, Line::Header(_)) => (ScanState::InBody, Action::Open),
            (ScanState::InBody, Line::Body { .. }) => (ScanState::InBody, Action::Append),
            (ScanState::InBody, Line::Other) => (ScanState::Seeking, Action::Stop),
            (ScanState::Seeking, _) => (ScanState::Seeking, Action::Ignore),
        }
    }
}

fn parse_header(line: &str) -> Option<Header> {
    let captures = HEADER_PATTERN.captures(line)?;
    let difficulty = captures.get(1).map_or(0, |m| m.as_str().len());
    let rest = captures.get(2).map_or("", |m| m.as_str());

    let (title, description) = match rest.split_once(DESCRIPTION_SEPARATOR) {
        Some((title, description)) => {
            let description = description.trim();
            (title, (!description.is_empty()).then(|| description.to_string()))
        }
        None => (rest, None),
    };

    Some(Header {
        difficulty,
        title: title.trim().to_string(),
        description,
    })
}

/// Strip the indentation token and the first inline annotation prefix.
fn strip_body_prefix(line: &str) -> &str {
    let rest = line.strip_prefix(INDENT).unwrap_or(line);
    match rest.strip_prefix(ANNOTATION_PREFIX) {
        Some(after) => after
            .strip_prefix(' ')
            .or_else(|| after.strip_prefix('\t'))
            .unwrap_or(after),
        None => rest,
    }
}

/// Classify one line.
///
/// A tab-led line keeps everything after the tab, trailing or inner
/// whitespace included, so `"\t  "` yields the body text `"  "`. Any
/// other whitespace-only line has no indentation to strip and becomes
/// an empty body line.
fn classify(line: &str) -> Line<'_> {
    if let Some(header) = parse_header(line) {
        return Line::Header(header);
    }

    if line.starts_with(INDENT) {
        let test_command = TEST_COMMAND_PATTERN
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str());

        return Line::Body {
            text: strip_body_prefix(line),
            test_command,
        };
    }

    if line.trim().is_empty() {
        return Line::Body {
            text: "",
            test_command: None,
        };
    }

    Line::Other
}

/// Extracts example blocks from documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleExtractor;

impl ExampleExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract every well-formed example in document order.
    pub fn extract(&self, document: &SourceDocument) -> Vec<ExampleBlock> {
        self.examples(document).collect()
    }

    /// Lazily iterate over the examples of a document.
    pub fn examples<'a>(&self, document: &'a SourceDocument) -> Examples<'a> {
        Examples {
            document_id: &document.id,
            lines: document.lines.iter().enumerate(),
            state: ScanState::Seeking,
            open: None,
        }
    }
}

/// Iterator over the examples of one document.
pub struct Examples<'a> {
    document_id: &'a str,
    lines: Enumerate<slice::Iter<'a, String>>,
    state: ScanState,
    open: Option<ExampleBlock>,
}

impl Examples<'_> {
    /// Pass a closed block through, dropping it when malformed.
    fn finish(&self, block: ExampleBlock) -> Option<ExampleBlock> {
        if block.has_content() {
            Some(block)
        } else {
            tracing::debug!(
                "Dropping example '{}' at {}:{} (empty body)",
                block.title,
                self.document_id,
                block.line
            );
            None
        }
    }
}

impl Iterator for Examples<'_> {
    type Item = ExampleBlock;

    fn next(&mut self) -> Option<ExampleBlock> {
        while let Some((index, raw)) = self.lines.next() {
            let line = classify(raw);
            let (state, action) = self.state.step(&line);
            self.state = state;

            match (action, line) {
                (Action::Open, Line::Header(header)) => {
                    let opened = ExampleBlock {
                        title: header.title,
                        difficulty: header.difficulty,
                        description: header.description,
                        test_command: None,
                        body: Vec::new(),
                        line: index + 1,
                    };

                    if let Some(closed) = self.open.replace(opened)
                        && let Some(block) = self.finish(closed)
                    {
                        return Some(block);
                    }
                }
                (Action::Append, Line::Body { text, test_command }) => {
                    if let Some(block) = self.open.as_mut() {
                        block.body.push(text.to_string());
                        // Later annotations overwrite earlier ones.
                        if let Some(command) = test_command {
                            block.test_command = Some(command.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        let closed = self.open.take()?;
        self.finish(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<ExampleBlock> {
        let document = SourceDocument::from_text("Vorple Test", text);
        ExampleExtractor::new().extract(&document)
    }

    #[test]
    fn test_header_with_stars_and_description() {
        let header = parse_header("Example: ** Lighting a Match - a short demo").unwrap();
        assert_eq!(header.difficulty, 2);
        assert_eq!(header.title, "Lighting a Match");
        assert_eq!(header.description.as_deref(), Some("a short demo"));
    }

    #[test]
    fn test_header_without_stars_or_separator() {
        let header = parse_header("Example: No Stars").unwrap();
        assert_eq!(header.difficulty, 0);
        assert_eq!(header.title, "No Stars");
        assert_eq!(header.description, None);
    }

    #[test]
    fn test_header_splits_on_first_separator() {
        let header = parse_header("Example: * Cat - Dog - Mouse").unwrap();
        assert_eq!(header.title, "Cat");
        assert_eq!(header.description.as_deref(), Some("Dog - Mouse"));
    }

    #[test]
    fn test_header_empty_title() {
        let header = parse_header("Example: ***").unwrap();
        assert_eq!(header.difficulty, 3);
        assert_eq!(header.title, "");

        let header = parse_header("Example: * - only a description").unwrap();
        assert_eq!(header.title, "");
        assert_eq!(header.description.as_deref(), Some("only a description"));
    }

    #[test]
    fn test_header_requires_line_start() {
        assert!(parse_header("\tExample: * Indented").is_none());
        assert!(parse_header("See Example: * Elsewhere").is_none());
    }

    #[test]
    fn test_body_prefix_stripping() {
        let blocks = extract("Example: * Two Lines\n\tfirst line\n\t*: second line\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, vec!["first line", "second line"]);
    }

    #[test]
    fn test_only_first_annotation_stripped() {
        let blocks = extract("Example: Repeat\n\t*: *: kept *: verbatim\n");
        assert_eq!(blocks[0].body, vec!["*: kept *: verbatim"]);
    }

    #[test]
    fn test_only_one_indent_stripped() {
        let blocks = extract("Example: Nested\n\tEvery turn:\n\t\tsay \"Tick.\"\n");
        assert_eq!(blocks[0].body, vec!["Every turn:", "\tsay \"Tick.\""]);
    }

    #[test]
    fn test_whitespace_only_lines() {
        let blocks = extract("Example: Gaps\n\tone\n   \n\t  \n\ttwo\n");
        assert_eq!(blocks[0].body, vec!["one", "", "  ", "two"]);
    }

    #[test]
    fn test_test_command_captured_and_kept_in_body() {
        let blocks = extract("Example: Go\n\tThe Hall is a room.\n\tTest me with \"go north\".\n");
        assert_eq!(blocks[0].test_command.as_deref(), Some("go north"));
        assert_eq!(
            blocks[0].body,
            vec!["The Hall is a room.", "Test me with \"go north\"."]
        );
    }

    #[test]
    fn test_test_command_last_write_wins() {
        let blocks = extract(
            "Example: Twice\n\tTest me with \"look\".\n\tTest me with \"x me / jump\".\n",
        );
        assert_eq!(blocks[0].test_command.as_deref(), Some("x me / jump"));
    }

    #[test]
    fn test_prose_stops_collection_until_next_header() {
        let text = "\
Example: * First
\tThe Lab is a room.

Some explanatory prose.
\tThis indented line follows prose and is ignored.
Example: ** Second - with text
\tThe Den is a room.
";
        let blocks = extract(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "First");
        assert_eq!(blocks[0].body, vec!["The Lab is a room.", ""]);
        assert_eq!(blocks[1].title, "Second");
        assert_eq!(blocks[1].difficulty, 2);
        assert_eq!(blocks[1].body, vec!["The Den is a room."]);
        assert_eq!(blocks[1].line, 6);
    }

    #[test]
    fn test_empty_body_dropped() {
        let text = "Example: Empty\n\nProse only.\nExample: Full\n\tThe Attic is a room.\n";
        let blocks = extract(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, "Full");
    }

    #[test]
    fn test_no_headers_yields_nothing() {
        assert!(extract("Chapter 1\n\tSome code without a header.\n").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_duplicate_titles_both_emitted() {
        let text = "Example: Same\n\tA is a room.\nExample: Same\n\tB is a room.\n";
        let blocks = extract(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, blocks[1].title);
        assert_ne!(blocks[0].body, blocks[1].body);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Example: * A - one\n\tX is a room.\nExample: B\n\tY is a room.\n";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_lazy_and_eager_agree() {
        let document = SourceDocument::from_text(
            "doc",
            "Example: A\n\tX is a room.\nExample: B\n\nExample: C\n\tZ is a room.\n",
        );
        let extractor = ExampleExtractor::new();
        let lazy: Vec<_> = extractor.examples(&document).collect();
        assert_eq!(lazy, extractor.extract(&document));
        assert_eq!(lazy.len(), 2);
    }

    #[test]
    fn test_transitions() {
        let body = Line::Body {
            text: "",
            test_command: None,
        };
        assert_eq!(
            ScanState::Seeking.step(&body),
            (ScanState::Seeking, Action::Ignore)
        );
        assert_eq!(
            ScanState::InBody.step(&Line::Other),
            (ScanState::Seeking, Action::Stop)
        );
        assert_eq!(
            ScanState::InBody.step(&body),
            (ScanState::InBody, Action::Append)
        );
    }
}
