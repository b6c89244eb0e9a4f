//! Core domain types shared by the search engine and the printer.

use serde::Serialize;
use std::fmt;
use std::io::IsTerminal;

/// Whether a reported line was selected or is surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Selected line (matching, or non-matching under invert).
    Match,
    /// Line printed only because it is near a selected line.
    Context,
}

/// Byte range of a single match inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One line reported by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// Line number (1-indexed).
    pub line_number: u64,
    /// Line content without its terminator.
    pub text: String,
    pub kind: LineKind,
    /// Match spans within `text`. Empty for context and inverted lines.
    pub spans: Vec<Span>,
    /// Contiguous block index; changes where a `--` separator belongs.
    pub group: u32,
}

impl LineRecord {
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.kind == LineKind::Match
    }
}

/// Everything a search found in one input.
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    /// Display label (path as given, or `stdin`).
    pub label: String,
    pub lines: Vec<LineRecord>,
    /// Number of selected lines. Context lines are not counted.
    pub match_count: u64,
    /// Search stopped on binary data.
    pub binary: bool,
}

impl FileReport {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_matches(&self) -> bool {
        self.match_count > 0
    }
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl ColorChoice {
    /// Resolves `Auto` against the terminal and `NO_COLOR`.
    #[must_use]
    pub fn enabled(self) -> bool {
        self.resolve(
            std::env::var_os("NO_COLOR").is_some(),
            std::io::stdout().is_terminal(),
        )
    }

    /// Resolves the choice given whether `NO_COLOR` is set and whether
    /// stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, no_color: bool, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => !no_color && is_terminal,
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Auto => write!(f, "auto"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "Invalid color choice: '{other}'. Valid choices: always, auto, never"
            )),
        }
    }
}

// Compile-time assertions for thread safety.
// Reports cross rayon worker boundaries.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<LineRecord>();
    assert_send_sync::<FileReport>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_choice_parse() {
        assert_eq!("always".parse::<ColorChoice>(), Ok(ColorChoice::Always));
        assert_eq!("NEVER".parse::<ColorChoice>(), Ok(ColorChoice::Never));
        assert!("sometimes".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_color_choice_fixed() {
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
        assert!(ColorChoice::Always.resolve(true, false));
        assert!(!ColorChoice::Never.resolve(false, true));
    }

    #[test]
    fn test_color_auto_honors_no_color() {
        assert!(ColorChoice::Auto.resolve(false, true));
        assert!(!ColorChoice::Auto.resolve(true, true));
        assert!(!ColorChoice::Auto.resolve(false, false));
        assert!(!ColorChoice::Auto.resolve(true, false));
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(3, 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert!(Span::new(2, 2).is_empty());
    }

    #[test]
    fn test_report_has_matches() {
        let mut report = FileReport::new("a.txt");
        assert!(!report.has_matches());
        report.match_count = 1;
        assert!(report.has_matches());
    }
}
