// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end pipeline tests.
//!
//! These tests run tools through the harness, persist their artifacts,
//! aggregate them and compare snapshots, the way the CLI does across
//! separate invocations.

use std::cell::RefCell;
use std::collections::BTreeMap;

use monobench_benchmark::{
    CommandRunner, JsonReporter, ProcessRunner, RetryPolicy, RunOutcome, ToolBenchmark,
    ToolProfile,
};
use monobench_core::{
    combine, AggregateError, ChangeAnalyzer, CommandSpec, Concurrency, Level, MemoryLogger,
    ToolId,
};
use tempfile::TempDir;

/// Succeeds for every tool except the ones listed as broken.
struct FakeRunner {
    broken: Vec<String>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl FakeRunner {
    fn new(broken: &[&str]) -> Self {
        Self {
            broken: broken.iter().map(|s| s.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &CommandSpec, _env: &BTreeMap<String, String>) -> RunOutcome {
        self.calls.borrow_mut().push(command.clone());
        let failing = self.broken.contains(&command.executable);
        RunOutcome {
            exit_status: Some(if failing { 1 } else { 0 }),
            stderr: if failing {
                "cache database is locked".to_string()
            } else {
                String::new()
            },
            ..RunOutcome::default()
        }
    }
}

#[test]
fn test_full_pipeline_with_partial_results() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let reporter = JsonReporter::new(temp_dir.path().join("results")).unwrap();
    let runner = FakeRunner::new(&["lage"]);
    let logger = MemoryLogger::new();
    let bench = ToolBenchmark::new(&runner, RetryPolicy::new(2), &logger);

    // Only three of the five tools are benchmarked this time.
    for tool in [ToolId::Nx, ToolId::Turbo, ToolId::Lage] {
        let profile = ToolProfile::for_tool(tool);
        let result = bench.execute_profile(&profile, Concurrency { prep: 1, measure: 2 }, 2, 4);
        assert_eq!(result.runs.len(), 4);
        reporter
            .save_artifact(&JsonReporter::stamp(tool, result))
            .unwrap();
    }

    // lage failed every trial but its durations were still recorded
    assert!(logger.contains(Level::Warn, "lage"));
    assert!(logger.contains(Level::Warn, "cache database is locked"));

    let artifacts = reporter.load_artifacts().unwrap();
    assert_eq!(artifacts.len(), 3);

    let aggregated = combine(&artifacts).unwrap();
    assert_eq!(aggregated.runs, 4);
    assert_eq!(aggregated.tools.len(), 5);
    assert!(!aggregated.tools[&ToolId::Lerna].has_data());
    assert!(!aggregated.tools[&ToolId::Moon].has_data());
    assert_eq!(aggregated.comparisons.len(), 2);

    let aggregate_path = temp_dir.path().join("results").join("benchmark-results.json");
    JsonReporter::save_aggregate(&aggregate_path, &aggregated).unwrap();
    let reloaded = JsonReporter::load_snapshot(&aggregate_path)
        .unwrap()
        .expect("snapshot was just written");
    assert_eq!(reloaded.timestamp, aggregated.timestamp);
    assert_eq!(reloaded.measured_tools(), aggregated.measured_tools());
    assert_eq!(
        reloaded.comparisons.keys().collect::<Vec<_>>(),
        aggregated.comparisons.keys().collect::<Vec<_>>()
    );

    let report = ChangeAnalyzer::default().analyze(&reloaded, None);
    assert!(report.significant);
    assert!(!report.regression);
}

#[test]
fn test_no_artifacts_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let reporter = JsonReporter::new(temp_dir.path()).unwrap();

    let artifacts = reporter.load_artifacts().unwrap();
    assert!(artifacts.is_empty());
    assert_eq!(combine(&artifacts), Err(AggregateError::NoData));
}

#[test]
fn test_aggregate_file_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let reporter = JsonReporter::new(temp_dir.path()).unwrap();
    let runner = FakeRunner::new(&[]);
    let logger = MemoryLogger::new();
    let bench = ToolBenchmark::new(&runner, RetryPolicy::default(), &logger);

    for profile in ToolProfile::all() {
        let result = bench.execute_profile(&profile, Concurrency { prep: 1, measure: 1 }, 1, 3);
        reporter
            .save_artifact(&JsonReporter::stamp(profile.tool, result))
            .unwrap();
    }

    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.json");
    JsonReporter::save_aggregate(&first, &combine(&reporter.load_artifacts().unwrap()).unwrap())
        .unwrap();
    JsonReporter::save_aggregate(&second, &combine(&reporter.load_artifacts().unwrap()).unwrap())
        .unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
    // nx reset ran once, before lerna's prep
    let resets = runner
        .calls
        .borrow()
        .iter()
        .filter(|c| c.to_string() == "nx reset")
        .count();
    assert_eq!(resets, 1);
}

#[cfg(unix)]
#[test]
fn test_real_processes_from_bin_dir() {
    let bin_dir = TempDir::new().expect("Failed to create temp dir");
    std::os::unix::fs::symlink("/bin/true", bin_dir.path().join("turbo")).unwrap();

    let runner = ProcessRunner::new(bin_dir.path());
    let logger = MemoryLogger::new();
    let bench = ToolBenchmark::new(&runner, RetryPolicy::default(), &logger);

    let result = bench.execute_profile(
        &ToolProfile::for_tool(ToolId::Turbo),
        Concurrency { prep: 1, measure: 1 },
        1,
        3,
    );

    assert_eq!(result.runs.len(), 3);
    assert!(result.runs.iter().all(|ms| *ms > 0.0));
    assert!(result.min <= result.average && result.average <= result.max);
    assert_eq!(logger.count(Level::Warn), 0);
}
