//! grepverse: a fast, parallel grep.
//!
//! This library provides a line-oriented search tool using:
//! - ripgrep internals (`grep-searcher`, `grep-regex`) for matching
//! - `ignore` for gitignore-aware directory walking and glob filters
//! - rayon for searching many files at once
//! - Memory-mapped reads for files up to 1 GiB when searching binaries as text
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 CLI (clap)                  │
//! │        flags → SearchConfig → run()         │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │   pattern::build_matcher  walk::collect_inputs
//! │   (validate + compile)    (paths, globs)    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │               GrepService                   │
//! │   rayon pool, per-worker Searcher reuse     │
//! └─────────────────┬───────────────────────────┘
//!                   │ FileReport (input order)
//! ┌─────────────────▼───────────────────────────┐
//! │                 Printer                     │
//! │   lines · count · files · quiet · json      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod output;
pub mod pattern;
pub mod runner;
pub mod services;
pub mod types;

pub use error::{GrepverseError, Result};
pub use runner::{run, RunSummary, SearchConfig};
pub use types::{ColorChoice, FileReport, LineKind, LineRecord, Span};
