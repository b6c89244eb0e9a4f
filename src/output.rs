//! Result printers.
//!
//! [`Printer`] turns [`FileReport`]s into one of the output formats. When
//! `color` is true, ANSI escape codes are emitted via `owo_colors`.

use crate::runner::RunSummary;
use crate::types::{FileReport, LineRecord, Span};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

/// Which output format to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Matching lines, optionally with context.
    #[default]
    Lines,
    /// A single total of selected lines.
    Count,
    /// Names of files with at least one selected line.
    FilesWithMatches,
    /// Nothing; only the exit status matters.
    Quiet,
    /// Newline-delimited JSON events.
    Json,
}

/// Output configuration.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub mode: OutputMode,
    /// Prefix lines with their line number
    pub line_numbers: bool,
    /// Prefix lines with the file label
    pub with_filename: bool,
    /// Emit ANSI colors
    pub color: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Lines,
            line_numbers: false,
            with_filename: true,
            color: false,
        }
    }
}

/// JSON event stream, one object per line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Begin {
        path: &'a str,
    },
    Match {
        path: &'a str,
        line_number: u64,
        text: &'a str,
        submatches: &'a [Span],
    },
    Context {
        path: &'a str,
        line_number: u64,
        text: &'a str,
    },
    End {
        path: &'a str,
        match_count: u64,
        binary: bool,
    },
    Summary {
        files_searched: usize,
        files_matched: usize,
        matched_lines: u64,
        errors: usize,
    },
}

/// Writes reports in the configured format.
pub struct Printer<W: Write> {
    w: W,
    options: OutputOptions,
    /// Print `--` between non-adjacent blocks
    separators: bool,
    any_printed: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(w: W, options: OutputOptions, context: bool) -> Self {
        Self {
            w,
            options,
            separators: context,
            any_printed: false,
        }
    }

    /// Writes everything one input produced.
    pub fn write_report(&mut self, report: &FileReport) -> io::Result<()> {
        match self.options.mode {
            OutputMode::Lines => self.write_lines(report),
            OutputMode::FilesWithMatches => {
                if report.has_matches() {
                    self.write_label(&report.label)?;
                    writeln!(self.w)?;
                }
                Ok(())
            }
            OutputMode::Json => self.write_json(report),
            // Totals are written by `finish`
            OutputMode::Count | OutputMode::Quiet => Ok(()),
        }
    }

    /// Writes trailing output and flushes.
    pub fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        match self.options.mode {
            OutputMode::Count => writeln!(self.w, "{}", summary.matched_lines)?,
            OutputMode::Json => self.emit(&JsonEvent::Summary {
                files_searched: summary.files_searched,
                files_matched: summary.files_matched,
                matched_lines: summary.matched_lines,
                errors: summary.errors,
            })?,
            _ => {}
        }
        self.w.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.w
    }

    // ── lines ───────────────────────────────────────────────────────────────

    fn write_lines(&mut self, report: &FileReport) -> io::Result<()> {
        let mut last_group = None;

        for line in &report.lines {
            if self.separators && self.any_printed && last_group != Some(line.group) {
                writeln!(self.w, "--")?;
            }
            last_group = Some(line.group);
            self.write_line(&report.label, line)?;
            self.any_printed = true;
        }

        if report.binary && report.has_matches() {
            writeln!(self.w, "Binary file {} matches", report.label)?;
        }

        Ok(())
    }

    fn write_line(&mut self, label: &str, line: &LineRecord) -> io::Result<()> {
        let sep = if line.is_match() { ':' } else { '-' };

        if self.options.with_filename {
            self.write_label(label)?;
            write!(self.w, "{sep}")?;
        }

        if self.options.line_numbers {
            if self.options.color {
                write!(self.w, "{}{sep}", line.line_number.green())?;
            } else {
                write!(self.w, "{}{sep}", line.line_number)?;
            }
        }

        if self.options.color && !line.spans.is_empty() {
            self.write_highlighted(&line.text, &line.spans)?;
        } else {
            write!(self.w, "{}", line.text)?;
        }

        writeln!(self.w)
    }

    fn write_label(&mut self, label: &str) -> io::Result<()> {
        if self.options.color {
            write!(self.w, "{}", label.green())
        } else {
            write!(self.w, "{label}")
        }
    }

    fn write_highlighted(&mut self, text: &str, spans: &[Span]) -> io::Result<()> {
        let mut cursor = 0;
        for span in spans {
            let valid = span.start >= cursor
                && span.end <= text.len()
                && text.is_char_boundary(span.start)
                && text.is_char_boundary(span.end);
            if !valid {
                continue;
            }
            let hit: &str = &text[span.start..span.end];
            write!(self.w, "{}{}", &text[cursor..span.start], hit.red().bold())?;
            cursor = span.end;
        }
        write!(self.w, "{}", &text[cursor..])
    }

    // ── json ────────────────────────────────────────────────────────────────

    fn write_json(&mut self, report: &FileReport) -> io::Result<()> {
        if report.lines.is_empty() && !report.has_matches() {
            return Ok(());
        }

        let path = report.label.as_str();
        self.emit(&JsonEvent::Begin { path })?;
        for line in &report.lines {
            let event = if line.is_match() {
                JsonEvent::Match {
                    path,
                    line_number: line.line_number,
                    text: &line.text,
                    submatches: &line.spans,
                }
            } else {
                JsonEvent::Context {
                    path,
                    line_number: line.line_number,
                    text: &line.text,
                }
            };
            self.emit(&event)?;
        }
        self.emit(&JsonEvent::End {
            path,
            match_count: report.match_count,
            binary: report.binary,
        })
    }

    fn emit(&mut self, event: &JsonEvent<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.w, event)?;
        writeln!(self.w)
    }
}
