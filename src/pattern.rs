//! Pattern validation and matcher construction.
//!
//! Every search mode compiles down to a single `RegexMatcher`:
//! literal modes escape the pattern first, regex mode validates it.
//!
//! # Limits
//!
//! Regex patterns are bounded in length and group nesting depth so a
//! pathological pattern fails fast with a readable message instead of
//! producing an oversized automaton.

use crate::error::{PatternError, PatternResult};
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

/// Maximum regex pattern length in bytes.
pub const MAX_PATTERN_LENGTH: usize = 4096;

/// Maximum nesting depth for groups.
pub const MAX_NESTING_DEPTH: usize = 32;

/// How the pattern text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternKind {
    /// Plain substring search (the default).
    #[default]
    Substring,
    /// Fixed string, explicitly requested with `-F`.
    Fixed,
    /// Regular expression.
    Regex,
}

impl PatternKind {
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Substring | Self::Fixed)
    }
}

/// Options controlling matcher construction.
#[derive(Debug, Clone, Default)]
pub struct MatcherOptions {
    pub kind: PatternKind,
    /// Case insensitive search
    pub ignore_case: bool,
    /// Only match whole words
    pub word: bool,
}

/// Validates a pattern before compilation.
///
/// Literal patterns are always valid. Regex patterns are checked for
/// length, nesting depth and syntax.
///
/// # Example
///
/// ```
/// use grepverse::pattern::{validate_pattern, PatternKind};
///
/// assert!(validate_pattern("fn\\s+\\w+", PatternKind::Regex).is_ok());
/// assert!(validate_pattern("(unclosed", PatternKind::Regex).is_err());
/// assert!(validate_pattern("(unclosed", PatternKind::Fixed).is_ok());
/// ```
pub fn validate_pattern(pattern: &str, kind: PatternKind) -> PatternResult<()> {
    if kind.is_literal() {
        return Ok(());
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(PatternError::TooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }

    let depth = count_nesting_depth(pattern);
    if depth > MAX_NESTING_DEPTH {
        return Err(PatternError::TooDeep {
            depth,
            max: MAX_NESTING_DEPTH,
        });
    }

    regex_syntax::Parser::new()
        .parse(pattern)
        .map_err(|e| PatternError::Syntax(e.to_string()))?;

    Ok(())
}

/// Builds the line matcher for a pattern.
///
/// # Errors
///
/// Returns a `PatternError` if validation fails or the pattern can match
/// a line terminator.
pub fn build_matcher(pattern: &str, options: &MatcherOptions) -> PatternResult<RegexMatcher> {
    validate_pattern(pattern, options.kind)?;

    let source = if options.kind.is_literal() {
        regex::escape(pattern)
    } else {
        pattern.to_string()
    };

    tracing::debug!(
        kind = ?options.kind,
        ignore_case = options.ignore_case,
        word = options.word,
        "building matcher"
    );

    RegexMatcherBuilder::new()
        .case_insensitive(options.ignore_case)
        .word(options.word)
        .line_terminator(Some(b'\n'))
        .build(&source)
        .map_err(|e| PatternError::Build(e.to_string()))
}

/// Counts the maximum nesting depth of groups in a pattern.
fn count_nesting_depth(pattern: &str) -> usize {
    let mut max_depth: usize = 0;
    let mut current_depth: usize = 0;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' => {
                current_depth += 1;
                max_depth = max_depth.max(current_depth);
            }
            ')' => {
                current_depth = current_depth.saturating_sub(1);
            }
            '[' => {
                // Skip character class; a leading `]` (after an optional `^`) is a member
                chars.next_if_eq(&'^');
                chars.next_if_eq(&']');
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        chars.next();
                    } else if c == ']' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    max_depth
}
