//! `grep_searcher::Sink` that collects lines into a [`FileReport`].

use crate::types::{FileReport, LineKind, LineRecord, Span};
use grep_matcher::Matcher;
use grep_regex::RegexMatcher;
use grep_searcher::{Searcher, Sink, SinkContext, SinkMatch};
use std::borrow::Cow;
use std::io;

/// Collects selected and context lines for one input.
pub(crate) struct ReportSink<'a> {
    matcher: &'a RegexMatcher,
    report: &'a mut FileReport,
    invert: bool,
    max_count: Option<u64>,
    group: u32,
}

impl<'a> ReportSink<'a> {
    pub(crate) fn new(
        matcher: &'a RegexMatcher,
        report: &'a mut FileReport,
        invert: bool,
        max_count: Option<u64>,
    ) -> Self {
        Self {
            matcher,
            report,
            invert,
            max_count,
            group: 0,
        }
    }

    fn limit_reached(&self) -> bool {
        self.max_count
            .is_some_and(|max| self.report.match_count >= max)
    }

    fn push(&mut self, line_number: u64, raw: &[u8], kind: LineKind) -> io::Result<()> {
        let bytes = trim_terminator(raw);
        let (text, exact) = match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(s) => (s.to_string(), true),
            Cow::Owned(s) => (s, false),
        };

        // Offsets are only meaningful when the text was not rewritten
        let spans = if kind == LineKind::Match && !self.invert && exact {
            find_spans(self.matcher, bytes)?
        } else {
            Vec::new()
        };

        self.report.lines.push(LineRecord {
            line_number,
            text,
            kind,
            spans,
            group: self.group,
        });
        Ok(())
    }
}

impl Sink for ReportSink<'_> {
    type Error = io::Error;

    fn matched(&mut self, _searcher: &Searcher, mat: &SinkMatch<'_>) -> Result<bool, io::Error> {
        if self.limit_reached() {
            return Ok(false);
        }

        let mut line_number = mat.line_number().unwrap_or(0);
        for line in mat.lines() {
            self.push(line_number, line, LineKind::Match)?;
            self.report.match_count += 1;
            line_number += 1;
            if self.limit_reached() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn context(&mut self, _searcher: &Searcher, ctx: &SinkContext<'_>) -> Result<bool, io::Error> {
        let line_number = ctx.line_number().unwrap_or(0);
        self.push(line_number, ctx.bytes(), LineKind::Context)?;
        Ok(true)
    }

    fn context_break(&mut self, _searcher: &Searcher) -> Result<bool, io::Error> {
        self.group += 1;
        Ok(true)
    }

    fn binary_data(
        &mut self,
        _searcher: &Searcher,
        binary_byte_offset: u64,
    ) -> Result<bool, io::Error> {
        tracing::debug!(
            "{}: binary data at byte {binary_byte_offset}",
            self.report.label
        );
        self.report.binary = true;
        Ok(false)
    }
}

/// Strips a trailing `\n` or `\r\n`.
fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Byte spans of every non-empty match in a line.
fn find_spans(matcher: &RegexMatcher, line: &[u8]) -> io::Result<Vec<Span>> {
    let mut spans = Vec::new();
    matcher
        .find_iter(line, |m| {
            if !m.is_empty() {
                spans.push(Span::new(m.start(), m.end()));
            }
            true
        })
        .map_err(|e| io::Error::other(e.to_string()))?;
    Ok(spans)
}
