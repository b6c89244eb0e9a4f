//! Error types for grepverse.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum GrepverseError {
    #[error("{0}")]
    Pattern(#[from] PatternError),

    #[error("{0}")]
    Walk(#[from] WalkError),

    #[error("{path}: {source}")]
    Search {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Pattern validation and compilation errors.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("pattern is {len} bytes, the limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("pattern nests groups {depth} deep, the limit is {max}")]
    TooDeep { depth: usize, max: usize },

    #[error("invalid regex: {0}")]
    Syntax(String),

    #[error("cannot build matcher: {0}")]
    Build(String),
}

/// Input discovery errors.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("invalid glob '{glob}': {reason}")]
    Glob { glob: String, reason: String },

    #[error("{path}: No such file or directory")]
    NotFound { path: PathBuf },

    #[error("{path}: Is a directory")]
    IsDirectory { path: PathBuf },

    #[error("standard input given more than once")]
    DuplicateStdin,

    #[error("walk error: {0}")]
    Traversal(String),
}

/// Result type alias for grepverse operations.
pub type Result<T> = std::result::Result<T, GrepverseError>;

/// Result type alias for pattern operations.
pub type PatternResult<T> = std::result::Result<T, PatternError>;

// Error code implementations for machine-readable error responses
impl GrepverseError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pattern(e) => e.code(),
            Self::Walk(e) => e.code(),
            Self::Search { .. } => "SEARCH_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the run can continue past this error.
    ///
    /// Per-input failures are recoverable; a bad pattern or glob is not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Search { .. } => true,
            Self::Walk(e) => !matches!(e, WalkError::Glob { .. }),
            _ => false,
        }
    }
}

impl PatternError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLong { .. } => "PATTERN_TOO_LONG",
            Self::TooDeep { .. } => "PATTERN_TOO_DEEP",
            Self::Syntax(_) => "INVALID_PATTERN",
            Self::Build(_) => "MATCHER_BUILD_ERROR",
        }
    }
}

impl WalkError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Glob { .. } => "INVALID_GLOB",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::IsDirectory { .. } => "IS_DIRECTORY",
            Self::DuplicateStdin => "DUPLICATE_STDIN",
            Self::Traversal(_) => "WALK_ERROR",
        }
    }
}
