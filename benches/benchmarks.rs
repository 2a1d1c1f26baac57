//! Benchmark suite for pilot.
//!
//! This module provides performance benchmarks for:
//! - Task parsing (checkbox lines and whole files)
//! - Section lookup (insertion points)
//! - Metrics (streak computation)
//! - Aggregation over a project on disk
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Save baseline for comparison
//! cargo bench -- --save-baseline main
//!
//! # Compare against baseline
//! cargo bench -- --baseline main
//! ```

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pilot::aggregate::{aggregate, parse_tasks};
use pilot::markdown::{find_insertion_point, parse_line};
use pilot::{compute_metrics, LocalFileStore, LogEntry, Project, ProjectConfig};
use tempfile::TempDir;

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");
    let file = Path::new("tasks.md");

    for (name, line) in [
        ("checked", "  - [x] Review the quarterly roadmap draft"),
        ("unchecked", "- [ ] Review the quarterly roadmap draft"),
        ("prose", "Some paragraph text that is not a task at all."),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| black_box(parse_line(black_box(line), file, 1)));
        });
    }

    group.finish();
}

fn bench_parse_tasks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_tasks");

    for size in [100, 1_000, 10_000] {
        let content = task_file(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| black_box(parse_tasks(black_box(content), Path::new("tasks.md"))));
        });
    }

    group.finish();
}

// ============================================================================
// Section Benchmarks
// ============================================================================

fn bench_insertion_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion_point");

    for size in [100, 1_000, 10_000] {
        let content = task_file(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| black_box(find_insertion_point(black_box(content), Some("section 3"))));
        });
    }

    group.finish();
}

// ============================================================================
// Metrics Benchmarks
// ============================================================================

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let tasks = parse_tasks(&task_file(1_000), Path::new("tasks.md"));

    for days in [30, 365, 3_650] {
        let logs: Vec<LogEntry> = (0..days)
            .map(|i| {
                let date = start + Duration::days(i);
                LogEntry::new(date, format!("5-logs/{date}.md"))
            })
            .collect();

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("streak", days), &logs, |b, logs| {
            b.iter(|| black_box(compute_metrics(&tasks, black_box(logs), Utc::now())));
        });
    }

    group.finish();
}

// ============================================================================
// Aggregation Benchmarks
// ============================================================================

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);

    for files in [10, 100] {
        let temp_dir = create_project(files);
        let project = Project::new(temp_dir.path(), ProjectConfig::default_for("bench"));
        let store = LocalFileStore::new();

        group.throughput(Throughput::Elements(files as u64));
        group.bench_with_input(BenchmarkId::from_parameter(files), &project, |b, project| {
            b.iter(|| black_box(aggregate(&store, project)));
        });
    }

    group.finish();
}

// ============================================================================
// Helpers
// ============================================================================

/// A task file with `tasks` checkbox lines spread over sections of ten.
fn task_file(tasks: usize) -> String {
    let mut content = String::from("# Tasks\n\n");
    for i in 0..tasks {
        if i % 10 == 0 {
            content.push_str(&format!("\n## Section {}\n", i / 10));
        }
        let mark = if i % 3 == 0 { 'x' } else { ' ' };
        content.push_str(&format!("- [{mark}] Task number {i}\n"));
    }
    content
}

fn create_project(files: usize) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();

    fs::create_dir_all(root.join("3-development")).expect("Failed to create folder");
    fs::create_dir_all(root.join("5-logs")).expect("Failed to create logs");
    fs::write(root.join("tasks.md"), task_file(50)).expect("Failed to write tasks.md");

    for i in 0..files {
        fs::write(root.join(format!("3-development/notes_{i}.md")), task_file(20))
            .expect("Failed to write notes");
        fs::write(
            root.join(format!("5-logs/2024-01-{:02}.md", i % 28 + 1)),
            "## Goals\n- [x] Ship\n\n## Progress\n- Shipped\n",
        )
        .expect("Failed to write log");
    }

    temp_dir
}

criterion_group!(parse_benches, bench_parse_line, bench_parse_tasks);

criterion_group!(section_benches, bench_insertion_point);

criterion_group!(metrics_benches, bench_metrics, bench_aggregate);

criterion_main!(parse_benches, section_benches, metrics_benches);
