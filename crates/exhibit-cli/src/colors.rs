//! ANSI escapes used by the progress output and command summaries.

use std::io::{self, Write};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";

/// Wrap `text` in `color` and a trailing reset.
pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// `✓` in green for success, `✗` in red otherwise.
pub fn mark(ok: bool) -> String {
    if ok { paint(GREEN, "✓") } else { paint(RED, "✗") }
}

/// Print without a newline; the outcome mark completes the line later.
pub fn print_pending(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_resets_color() {
        assert_eq!(mark(true), "\x1b[32m✓\x1b[0m");
        assert!(mark(false).starts_with(RED));
        assert!(mark(false).ends_with(RESET));
    }
}
