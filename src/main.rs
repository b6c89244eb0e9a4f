//! grepverse: a fast, parallel grep.
//!
//! Usage:
//!   grepverse <pattern> [path...]          # substring search
//!   grepverse -r '<regex>' -R src          # recursive regex search
//!   grepverse -c -i todo notes.txt         # count matching lines
//!   some-command | grepverse error -       # search stdin
//!   grepverse --generate bash              # shell completions

use anyhow::Context;
use clap::{CommandFactory, Parser};
use grepverse::output::{OutputMode, OutputOptions};
use grepverse::pattern::{MatcherOptions, PatternKind};
use grepverse::services::{BinaryMode, SearchOptions, WalkConfig};
use grepverse::{ColorChoice, GrepverseError, SearchConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grepverse")]
#[command(about = "A grep-like utility written in Rust")]
#[command(version)]
struct Cli {
    /// The pattern to search for
    #[arg(required_unless_present = "generate")]
    pattern: Option<String>,

    /// Files or directories to search ('-' for stdin; default: stdin, or '.' with -R)
    paths: Vec<String>,

    /// Interpret the pattern as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// Interpret the pattern as a fixed string
    #[arg(short = 'F', long, conflicts_with = "regex")]
    fixed_strings: bool,

    /// Ignore case distinctions
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Match only whole words
    #[arg(short = 'w', long)]
    word_regexp: bool,

    /// Select non-matching lines
    #[arg(short = 'v', long)]
    invert_match: bool,

    /// Prefix each line of output with its line number
    #[arg(short = 'n', long)]
    line_number: bool,

    /// Print only a count of selected lines
    #[arg(short = 'c', long)]
    count: bool,

    /// Print only the names of files with selected lines
    #[arg(short = 'l', long)]
    files_with_matches: bool,

    /// Print nothing; exit status reports whether anything matched
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Lines of context before and after each match
    #[arg(short = 'C', long, value_name = "NUM")]
    context: Option<usize>,

    /// Lines of context after each match (overrides -C)
    #[arg(short = 'A', long, value_name = "NUM")]
    after_context: Option<usize>,

    /// Lines of context before each match (overrides -C)
    #[arg(short = 'B', long, value_name = "NUM")]
    before_context: Option<usize>,

    /// Stop each file after NUM selected lines
    #[arg(short = 'm', long, value_name = "NUM")]
    max_count: Option<u64>,

    /// Read all files under each directory, recursively
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Search only files matching GLOB (repeatable)
    #[arg(long, value_name = "GLOB")]
    include: Vec<String>,

    /// Skip files matching GLOB (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Search hidden files and directories
    #[arg(long)]
    hidden: bool,

    /// Don't honor .gitignore, .ignore or git exclude files
    #[arg(long)]
    no_ignore: bool,

    /// Follow symbolic links while walking
    #[arg(short = 'L', long)]
    follow: bool,

    /// Maximum directory depth to descend
    #[arg(long, value_name = "NUM")]
    max_depth: Option<usize>,

    /// Search binary files as if they were text
    #[arg(short = 'a', long)]
    text: bool,

    /// Worker threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// When to highlight matches: always, auto, never
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    color: ColorChoice,

    /// Emit results as newline-delimited JSON
    #[arg(long)]
    json: bool,

    /// Don't prefix output lines with the file name
    #[arg(long)]
    no_filename: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    generate: Option<clap_complete::Shell>,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.json {
            OutputMode::Json
        } else if self.files_with_matches {
            OutputMode::FilesWithMatches
        } else if self.count {
            OutputMode::Count
        } else {
            OutputMode::Lines
        }
    }

    fn into_config(self) -> SearchConfig {
        let kind = if self.regex {
            PatternKind::Regex
        } else if self.fixed_strings {
            PatternKind::Fixed
        } else {
            PatternKind::Substring
        };

        SearchConfig {
            output: OutputOptions {
                mode: self.output_mode(),
                line_numbers: self.line_number,
                with_filename: !self.no_filename,
                color: self.color.enabled(),
            },
            pattern: self.pattern.unwrap_or_default(),
            paths: self.paths,
            matcher: MatcherOptions {
                kind,
                ignore_case: self.ignore_case,
                word: self.word_regexp,
            },
            walk: WalkConfig {
                recursive: self.recursive,
                include: self.include,
                exclude: self.exclude,
                hidden: self.hidden,
                respect_ignore: !self.no_ignore,
                follow_symlinks: self.follow,
                max_depth: self.max_depth,
            },
            search: SearchOptions {
                invert: self.invert_match,
                before_context: self.before_context.or(self.context).unwrap_or(0),
                after_context: self.after_context.or(self.context).unwrap_or(0),
                max_count: self.max_count,
                binary: if self.text {
                    BinaryMode::Text
                } else {
                    BinaryMode::Skip
                },
                ..SearchOptions::default()
            },
            threads: self.threads,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("grepverse: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<u8> {
    // Log to stderr only (stdout carries results)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grepverse=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let mut stdout = io::stdout();
        clap_complete::generate(shell, &mut cmd, "grepverse", &mut stdout);
        stdout.flush().context("writing completions")?;
        return Ok(0);
    }

    let quiet = cli.quiet;
    let config = cli.into_config();

    let stdout = io::stdout();
    let out = io::BufWriter::new(stdout.lock());

    match grepverse::run(&config, out) {
        Ok(summary) => Ok(summary.exit_code(quiet)),
        // Downstream closed the pipe (e.g. `| head`); not an error
        Err(GrepverseError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(0),
        Err(e) => Err(e.into()),
    }
}
