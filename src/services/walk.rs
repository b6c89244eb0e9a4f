//! Input discovery: explicit paths, recursive walks and glob filtering.
//!
//! Recursive walks use `ignore::WalkBuilder` so `.gitignore`, `.ignore`
//! and hidden-file rules apply the way they do in ripgrep. Include and
//! exclude globs only ever look at files; directories are always entered.

use crate::error::{GrepverseError, WalkError};
use ahash::AHashSet;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Path argument that means standard input.
pub const STDIN_ARG: &str = "-";

/// A single thing to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    /// Label used in output.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "stdin".to_string(),
            Self::Path(p) => p.to_string_lossy().into_owned(),
        }
    }
}

/// Configuration for input discovery.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Descend into directories
    pub recursive: bool,
    /// Only search files matching one of these globs
    pub include: Vec<String>,
    /// Skip files matching any of these globs
    pub exclude: Vec<String>,
    /// Include hidden files
    pub hidden: bool,
    /// Honor .gitignore / .ignore / git excludes
    pub respect_ignore: bool,
    /// Follow symlinks
    pub follow_symlinks: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            include: Vec::new(),
            exclude: Vec::new(),
            hidden: false,
            respect_ignore: true,
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

/// Compiled include/exclude globs.
///
/// Globs follow gitignore syntax: a glob without `/` matches the file
/// name at any depth. Exclusions win over inclusions.
#[derive(Debug, Clone)]
pub struct FileFilter {
    globs: Override,
}

impl FileFilter {
    /// Compiles the filter.
    ///
    /// # Errors
    ///
    /// Returns `WalkError::Glob` for the first glob that fails to parse.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, WalkError> {
        if include.is_empty() && exclude.is_empty() {
            return Ok(Self::allow_all());
        }

        let mut builder = OverrideBuilder::new(".");
        // Later globs take precedence, so excludes go last.
        for glob in include {
            builder.add(glob).map_err(|e| glob_error(glob, &e))?;
        }
        for glob in exclude {
            builder
                .add(&format!("!{glob}"))
                .map_err(|e| glob_error(glob, &e))?;
        }

        let globs = builder.build().map_err(|e| WalkError::Glob {
            glob: include.iter().chain(exclude).cloned().collect::<Vec<_>>().join(","),
            reason: e.to_string(),
        })?;

        Ok(Self { globs })
    }

    /// A filter that accepts every file.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            globs: Override::empty(),
        }
    }

    /// Whether a file passes the include/exclude globs.
    #[must_use]
    pub fn allows(&self, path: &Path) -> bool {
        !self.globs.matched(path, false).is_ignore()
    }
}

fn glob_error(glob: &str, err: &ignore::Error) -> WalkError {
    WalkError::Glob {
        glob: glob.to_string(),
        reason: err.to_string(),
    }
}

/// Inputs to search plus the recoverable errors found while collecting them.
#[derive(Debug, Default)]
pub struct InputSet {
    pub inputs: Vec<Input>,
    pub errors: Vec<GrepverseError>,
}

/// Resolves path arguments into a deduplicated, ordered list of inputs.
///
/// Missing paths, directories without `recursive` and traversal failures
/// are collected as errors; everything else is still returned.
pub fn collect_inputs(paths: &[String], config: &WalkConfig, filter: &FileFilter) -> InputSet {
    let mut set = InputSet::default();
    let mut seen: AHashSet<PathBuf> = AHashSet::new();
    let mut stdin_seen = false;

    let default_arg;
    let paths: &[String] = if paths.is_empty() {
        default_arg = [if config.recursive { "." } else { STDIN_ARG }.to_string()];
        &default_arg
    } else {
        paths
    };

    for arg in paths {
        if arg == STDIN_ARG {
            if stdin_seen {
                set.errors.push(WalkError::DuplicateStdin.into());
            } else {
                stdin_seen = true;
                set.inputs.push(Input::Stdin);
            }
            continue;
        }

        let path = PathBuf::from(arg);
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                set.errors.push(WalkError::NotFound { path }.into());
                continue;
            }
            Err(source) => {
                set.errors.push(GrepverseError::Search { path, source });
                continue;
            }
        };

        if metadata.is_dir() {
            if config.recursive {
                walk_dir(&path, config, filter, &mut seen, &mut set);
            } else {
                set.errors.push(WalkError::IsDirectory { path }.into());
            }
        } else if filter.allows(&path) {
            push_unique(path, &mut seen, &mut set.inputs);
        } else {
            tracing::debug!("skipping {} (excluded by glob)", path.display());
        }
    }

    set
}

fn walk_dir(
    root: &Path,
    config: &WalkConfig,
    filter: &FileFilter,
    seen: &mut AHashSet<PathBuf>,
    set: &mut InputSet,
) {
    tracing::debug!("walking {}", root.display());

    let respect = config.respect_ignore;
    let walker = WalkBuilder::new(root)
        .hidden(!config.hidden)
        .follow_links(config.follow_symlinks)
        .max_depth(config.max_depth)
        .ignore(respect)
        .git_ignore(respect)
        .git_global(respect)
        .git_exclude(respect)
        .parents(respect)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(e) => {
                set.errors.push(WalkError::Traversal(e.to_string()).into());
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.into_path();
        if filter.allows(&path) {
            push_unique(path, seen, &mut set.inputs);
        }
    }
}

/// Adds a file unless its canonical path was already queued.
fn push_unique(path: PathBuf, seen: &mut AHashSet<PathBuf>, inputs: &mut Vec<Input>) {
    let key = dunce::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        inputs.push(Input::Path(path));
    } else {
        tracing::debug!("skipping duplicate input {}", path.display());
    }
}
