//! End-to-end search orchestration.
//!
//! Builds the matcher and file filter, collects inputs, searches them in
//! parallel and feeds every report to the printer in input order.

use crate::error::{GrepverseError, Result};
use crate::output::{OutputMode, OutputOptions, Printer};
use crate::pattern::{build_matcher, MatcherOptions};
use crate::services::grep::{GrepService, SearchOptions};
use crate::services::walk::{collect_inputs, FileFilter, InputSet, WalkConfig};
use crate::types::FileReport;
use std::io::Write;

/// Everything one invocation needs.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub pattern: String,
    /// Path arguments; `-` is stdin
    pub paths: Vec<String>,
    pub matcher: MatcherOptions,
    pub walk: WalkConfig,
    pub search: SearchOptions,
    pub output: OutputOptions,
    /// Worker threads (0 = auto-detect)
    pub threads: usize,
}

impl SearchConfig {
    /// Creates a configuration with default options.
    #[must_use]
    pub fn new(pattern: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            paths,
            ..Self::default()
        }
    }

    /// Search options adjusted for the output mode.
    ///
    /// Modes that never print lines do not need context, and modes that
    /// only care whether a file matched can stop at the first match.
    fn effective_search(&self) -> SearchOptions {
        let mut search = self.search.clone();
        match self.output.mode {
            OutputMode::FilesWithMatches | OutputMode::Quiet => {
                search.before_context = 0;
                search.after_context = 0;
                search.max_count = Some(search.max_count.map_or(1, |m| m.min(1)));
            }
            OutputMode::Count => {
                search.before_context = 0;
                search.after_context = 0;
            }
            OutputMode::Lines | OutputMode::Json => {}
        }
        search
    }
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_searched: usize,
    pub files_matched: usize,
    /// Selected lines over all inputs (context excluded)
    pub matched_lines: u64,
    /// Recoverable errors (missing files, unreadable inputs, ...)
    pub errors: usize,
}

impl RunSummary {
    /// Folds one report into the totals.
    pub fn record(&mut self, report: &FileReport) {
        self.files_searched += 1;
        if report.has_matches() {
            self.files_matched += 1;
            self.matched_lines += report.match_count;
        }
    }

    /// Logs and counts a recoverable error, or hands back a fatal one.
    fn absorb(&mut self, err: GrepverseError) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        tracing::warn!("{err}");
        self.errors += 1;
        Ok(())
    }

    /// Process exit status: 0 selected, 1 nothing selected, 2 error.
    ///
    /// In quiet mode a selection wins over errors.
    #[must_use]
    pub fn exit_code(&self, quiet: bool) -> u8 {
        let matched = self.matched_lines > 0;
        if self.errors > 0 && !(quiet && matched) {
            2
        } else if matched {
            0
        } else {
            1
        }
    }
}

/// Runs a search and writes results to `out`.
///
/// # Errors
///
/// Returns an error for an invalid pattern or glob, a thread pool failure,
/// a failed write, or any input error that is not recoverable. Recoverable
/// input errors are logged and counted in the summary instead.
pub fn run<W: Write>(config: &SearchConfig, out: W) -> Result<RunSummary> {
    let matcher = build_matcher(&config.pattern, &config.matcher)?;
    let filter = FileFilter::new(&config.walk.include, &config.walk.exclude)?;

    let InputSet { inputs, errors } = collect_inputs(&config.paths, &config.walk, &filter);

    let mut summary = RunSummary::default();
    for err in errors {
        summary.absorb(err)?;
    }

    let service = GrepService::with_threads(matcher, config.effective_search(), config.threads);
    let results = service.search_inputs(&inputs)?;

    let mut printer = Printer::new(
        out,
        config.output.clone(),
        service.options().has_context(),
    );

    for result in results {
        match result {
            Ok(report) => {
                summary.record(&report);
                printer.write_report(&report)?;
            }
            Err(err) => summary.absorb(err)?,
        }
    }

    printer.finish(&summary)?;

    tracing::debug!(
        files = summary.files_searched,
        matched = summary.files_matched,
        lines = summary.matched_lines,
        errors = summary.errors,
        "search finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let matched = RunSummary {
            matched_lines: 3,
            ..RunSummary::default()
        };
        assert_eq!(matched.exit_code(false), 0);

        assert_eq!(RunSummary::default().exit_code(false), 1);

        let failed = RunSummary {
            errors: 1,
            ..RunSummary::default()
        };
        assert_eq!(failed.exit_code(false), 2);
        assert_eq!(failed.exit_code(true), 2);

        let matched_with_errors = RunSummary {
            matched_lines: 1,
            errors: 1,
            ..RunSummary::default()
        };
        assert_eq!(matched_with_errors.exit_code(false), 2);
        assert_eq!(matched_with_errors.exit_code(true), 0);
    }

    #[test]
    fn test_effective_search_trims_for_mode() {
        let mut config = SearchConfig::new("x", Vec::new());
        config.search.before_context = 2;
        config.search.after_context = 2;

        config.output.mode = OutputMode::FilesWithMatches;
        let search = config.effective_search();
        assert_eq!(search.max_count, Some(1));
        assert!(!search.has_context());

        config.output.mode = OutputMode::Count;
        let search = config.effective_search();
        assert_eq!(search.max_count, None);
        assert!(!search.has_context());

        config.output.mode = OutputMode::Lines;
        assert!(config.effective_search().has_context());
    }

    #[test]
    fn test_absorb_counts_only_recoverable() {
        use crate::error::WalkError;
        use std::path::PathBuf;

        let mut summary = RunSummary::default();
        summary
            .absorb(
                WalkError::NotFound {
                    path: PathBuf::from("gone.txt"),
                }
                .into(),
            )
            .unwrap();
        summary
            .absorb(GrepverseError::Search {
                path: PathBuf::from("locked.txt"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
            .unwrap();
        assert_eq!(summary.errors, 2);

        let fatal = summary.absorb(GrepverseError::Config("thread pool".into()));
        assert_eq!(fatal.unwrap_err().code(), "CONFIG_ERROR");
        assert_eq!(summary.errors, 2);
    }

    #[test]
    fn test_summary_record() {
        let mut summary = RunSummary::default();
        let mut report = FileReport::new("a");
        summary.record(&report);
        report.match_count = 4;
        summary.record(&report);
        assert_eq!(summary.files_searched, 2);
        assert_eq!(summary.files_matched, 1);
        assert_eq!(summary.matched_lines, 4);
    }
}
