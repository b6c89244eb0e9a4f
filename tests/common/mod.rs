//! Common test utilities for grepverse integration tests.
//!
//! Provides `TestEnv` for setting up an isolated directory of files and
//! running searches against it with output captured in memory.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use grepverse::{run, RunSummary, SearchConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory plus helpers to search it.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Creates a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self { dir }
    }

    /// Writes a file to the test directory.
    pub fn write_file(&self, name: &str, content: &str) {
        self.write_bytes(name, content.as_bytes());
    }

    /// Writes raw bytes to the test directory.
    pub fn write_bytes(&self, name: &str, content: &[u8]) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
    }

    /// Gets the full path to a file in the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Path argument for a file in the test directory.
    pub fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    /// Path argument for the test directory itself.
    pub fn root_arg(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Config searching the given files with default options and no color.
    pub fn config(&self, pattern: &str, files: &[&str]) -> SearchConfig {
        let paths = files.iter().map(|f| self.arg(f)).collect();
        let mut config = SearchConfig::new(pattern, paths);
        config.threads = 2;
        config
    }

    /// Config for a recursive search of the whole directory.
    pub fn recursive_config(&self, pattern: &str) -> SearchConfig {
        let mut config = SearchConfig::new(pattern, vec![self.root_arg()]);
        config.walk.recursive = true;
        config.threads = 2;
        config
    }

    /// Runs a search, returning the summary and output with the temp
    /// directory prefix stripped from paths.
    pub fn run(&self, config: &SearchConfig) -> (RunSummary, String) {
        let mut out = Vec::new();
        let summary = run(config, &mut out).expect("search failed");
        let text = String::from_utf8(out).expect("output is not UTF-8");
        (summary, self.relative(&text))
    }

    /// Replaces the temp directory prefix so expected output stays short.
    pub fn relative(&self, text: &str) -> String {
        let prefix = format!("{}{}", self.root_arg(), std::path::MAIN_SEPARATOR);
        text.replace(&prefix, "")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a test environment with a small mixed project.
pub fn sample_project() -> TestEnv {
    let env = TestEnv::new();

    env.write_file(
        "src/main.rs",
        r#"fn main() {
    let config = Config::load();
    // TODO: handle errors
    run(&config);
}
"#,
    );

    env.write_file(
        "src/config.rs",
        r#"pub struct Config {
    pub verbose: bool,
}

impl Config {
    pub fn load() -> Self {
        // todo: read from disk
        Self { verbose: false }
    }
}
"#,
    );

    env.write_file(
        "docs/notes.md",
        "# Notes\n\nTODO list:\n- configure CI\n- write docs\n",
    );

    env.write_file("build/output.log", "TODO generated artifact\n");

    env
}
