//! Parallel grep service using ripgrep internals.
//!
//! Inputs are searched on a rayon pool. Each worker keeps its own pair of
//! `Searcher`s (memory-mapped and buffered) and reuses them across files,
//! avoiding per-file allocation overhead. Results come back in input order.
//!
//! Memory maps are only used with `BinaryMode::Text`; when binary files are
//! skipped every file goes through the buffered reader so a NUL byte is
//! caught wherever it sits.

use crate::error::{GrepverseError, Result};
use crate::services::sink::ReportSink;
use crate::services::walk::Input;
use crate::types::FileReport;
use grep_regex::RegexMatcher;
use grep_searcher::{BinaryDetection, MmapChoice, Searcher, SearcherBuilder};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::Path;

/// Files above this size are read through a buffer instead of mapped (1 GiB).
/// Applies to `BinaryMode::Text` searches.
pub const MAX_MMAP_SIZE: u64 = 1024 * 1024 * 1024;

/// Default upper bound on auto-detected worker threads.
pub const DEFAULT_THREAD_CAP: usize = 8;

/// What to do with files that contain NUL bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryMode {
    /// Stop searching the file and flag it as binary.
    #[default]
    Skip,
    /// Search it like any other text.
    Text,
}

/// Configuration for grep operations.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Select non-matching lines
    pub invert: bool,
    /// Context lines before match
    pub before_context: usize,
    /// Context lines after match
    pub after_context: usize,
    /// Stop a file after this many selected lines (None = unlimited)
    pub max_count: Option<u64>,
    pub binary: BinaryMode,
    /// Largest file that is memory mapped
    pub mmap_limit: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            invert: false,
            before_context: 0,
            after_context: 0,
            max_count: None,
            binary: BinaryMode::Skip,
            mmap_limit: MAX_MMAP_SIZE,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn has_context(&self) -> bool {
        self.before_context > 0 || self.after_context > 0
    }
}

/// Resolves a requested worker count (0 = auto-detect, capped).
#[must_use]
pub fn resolve_threads(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map_or(4, |n| n.get())
            .min(DEFAULT_THREAD_CAP)
    }
}

/// Per-worker searcher state.
struct Searchers {
    mapped: Searcher,
    buffered: Searcher,
}

/// Parallel grep service using ripgrep internals.
pub struct GrepService {
    matcher: RegexMatcher,
    options: SearchOptions,
    /// Number of parallel search threads
    num_threads: usize,
}

impl GrepService {
    /// Creates a service with an auto-detected thread count.
    #[must_use]
    pub fn new(matcher: RegexMatcher, options: SearchOptions) -> Self {
        Self::with_threads(matcher, options, 0)
    }

    /// Creates a service with an explicit thread count (0 = auto-detect).
    #[must_use]
    pub fn with_threads(matcher: RegexMatcher, options: SearchOptions, threads: usize) -> Self {
        Self {
            matcher,
            options,
            num_threads: resolve_threads(threads),
        }
    }

    #[must_use]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn build_searcher(&self, mmap: bool) -> Searcher {
        let mut builder = SearcherBuilder::new();
        builder
            .line_number(true)
            .invert_match(self.options.invert)
            .before_context(self.options.before_context)
            .after_context(self.options.after_context)
            .binary_detection(match self.options.binary {
                BinaryMode::Skip => BinaryDetection::quit(b'\x00'),
                BinaryMode::Text => BinaryDetection::none(),
            });
        if mmap {
            // SAFETY: a file truncated by another process while mapped can
            // fault; only regular files below `mmap_limit` reach this path.
            builder.memory_map(unsafe { MmapChoice::auto() });
        }
        builder.build()
    }

    /// Whether a file of `size` bytes is searched through a memory map.
    ///
    /// A mapped search only looks for NUL bytes in its first block, while
    /// the buffered reader checks every block it fills. Binary detection
    /// therefore always reads through the buffer.
    fn use_mmap(&self, size: u64) -> bool {
        self.options.binary == BinaryMode::Text && size <= self.options.mmap_limit
    }

    fn searchers(&self) -> Searchers {
        Searchers {
            mapped: self.build_searcher(true),
            buffered: self.build_searcher(false),
        }
    }

    fn sink<'a>(&'a self, report: &'a mut FileReport) -> ReportSink<'a> {
        ReportSink::new(
            &self.matcher,
            report,
            self.options.invert,
            self.options.max_count,
        )
    }

    /// Searches a single file.
    ///
    /// # Errors
    ///
    /// Returns `GrepverseError::Search` if the file cannot be read.
    pub fn search_path(&self, path: &Path) -> Result<FileReport> {
        self.search_path_with(&mut self.searchers(), path)
    }

    fn search_path_with(&self, searchers: &mut Searchers, path: &Path) -> Result<FileReport> {
        let mut report = FileReport::new(path.to_string_lossy());
        if self.options.max_count == Some(0) {
            return Ok(report);
        }

        let search_err = |source: io::Error| GrepverseError::Search {
            path: path.to_path_buf(),
            source,
        };

        let size = fs::metadata(path).map_err(search_err)?.len();
        let searcher = if self.use_mmap(size) {
            &mut searchers.mapped
        } else {
            tracing::debug!("{}: {size} bytes, using buffered reads", path.display());
            &mut searchers.buffered
        };

        let mut sink = self.sink(&mut report);
        searcher
            .search_path(&self.matcher, path, &mut sink)
            .map_err(search_err)?;

        Ok(report)
    }

    /// Searches any reader, labelling the report with `label`.
    ///
    /// # Errors
    ///
    /// Returns `GrepverseError::Search` if reading fails.
    pub fn search_reader<R: io::Read>(&self, label: &str, reader: R) -> Result<FileReport> {
        self.search_reader_with(&mut self.build_searcher(false), label, reader)
    }

    fn search_reader_with<R: io::Read>(
        &self,
        searcher: &mut Searcher,
        label: &str,
        reader: R,
    ) -> Result<FileReport> {
        let mut report = FileReport::new(label);
        if self.options.max_count == Some(0) {
            return Ok(report);
        }

        let mut sink = self.sink(&mut report);
        searcher
            .search_reader(&self.matcher, reader, &mut sink)
            .map_err(|source| GrepverseError::Search {
                path: label.into(),
                source,
            })?;

        Ok(report)
    }

    /// Searches all inputs in parallel, returning one result per input in
    /// the same order.
    ///
    /// # Errors
    ///
    /// Returns `GrepverseError::Config` if the thread pool cannot be built.
    /// Per-input failures are returned inside the vector.
    pub fn search_inputs(&self, inputs: &[Input]) -> Result<Vec<Result<FileReport>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| GrepverseError::Config(format!("thread pool: {e}")))?;

        tracing::debug!(
            "searching {} inputs on {} threads",
            inputs.len(),
            self.num_threads
        );

        Ok(pool.install(|| {
            inputs
                .par_iter()
                .map_init(
                    || self.searchers(),
                    |searchers, input| match input {
                        Input::Path(path) => self.search_path_with(searchers, path),
                        Input::Stdin => {
                            let stdin = io::stdin();
                            self.search_reader_with(
                                &mut searchers.buffered,
                                &input.label(),
                                stdin.lock(),
                            )
                        }
                    },
                )
                .collect()
        }))
    }
}
