//! Performance benchmarks for grepverse hot paths.
//!
//! Measures the core operations that dominate runtime:
//! - Matcher construction for each pattern kind
//! - Single-file search, memory-mapped vs buffered
//! - Parallel search across a directory tree
//!
//! Run with: `cargo bench`
//! View reports: `open target/criterion/report/index.html`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grepverse::pattern::{build_matcher, MatcherOptions, PatternKind};
use grepverse::services::{
    collect_inputs, BinaryMode, FileFilter, GrepService, SearchOptions, WalkConfig,
};
use std::fs;
use tempfile::TempDir;

fn source_text(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 97 == 0 {
                format!("fn function_{i}() {{ authenticate(&config)?; }}\n")
            } else {
                format!("    let value_{i} = compute({i}) + offset;\n")
            }
        })
        .collect()
}

// ============================================================================
// Matcher Benchmarks
// ============================================================================

fn bench_build_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_matcher");

    let cases = [
        ("substring", PatternKind::Substring, "authenticate"),
        ("regex", PatternKind::Regex, r"fn\s+\w+\(.*\)"),
    ];

    for (name, kind, pattern) in cases {
        let options = MatcherOptions {
            kind,
            ignore_case: true,
            word: false,
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(build_matcher(pattern, &options).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// Search Benchmarks
// ============================================================================

/// Compares memory-mapped and buffered reads on the same file (text mode,
/// the only mode that maps).
fn bench_single_file(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("large.rs");
    let content = source_text(200_000);
    fs::write(&path, &content).unwrap();

    let mut group = c.benchmark_group("single_file");
    group.throughput(Throughput::Bytes(content.len() as u64));

    for (name, mmap_limit) in [("mmap", u64::MAX), ("buffered", 0)] {
        let matcher = build_matcher("authenticate", &MatcherOptions::default()).unwrap();
        let service = GrepService::new(
            matcher,
            SearchOptions {
                mmap_limit,
                binary: BinaryMode::Text,
                ..SearchOptions::default()
            },
        );
        group.bench_function(name, |b| {
            b.iter(|| black_box(service.search_path(&path).unwrap()))
        });
    }

    group.finish();
}

/// Parallel search over a tree at different thread counts.
fn bench_tree_search(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    for i in 0..500 {
        let sub = dir.path().join(format!("mod_{}", i % 20));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("file_{i}.rs")), source_text(400)).unwrap();
    }

    let config = WalkConfig {
        recursive: true,
        ..WalkConfig::default()
    };
    let paths = vec![dir.path().to_string_lossy().into_owned()];
    let inputs = collect_inputs(&paths, &config, &FileFilter::allow_all()).inputs;

    let mut group = c.benchmark_group("tree_search");
    for threads in [1, 4, 8] {
        let matcher = build_matcher("authenticate", &MatcherOptions::default()).unwrap();
        let service = GrepService::with_threads(matcher, SearchOptions::default(), threads);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &inputs, |b, inputs| {
            b.iter(|| black_box(service.search_inputs(inputs).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_matcher, bench_single_file, bench_tree_search);
criterion_main!(benches);
