// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `monobench aggregate` command - Combine per-tool results into one snapshot.

use std::path::Path;

use anyhow::Context;
use monobench_benchmark::JsonReporter;
use monobench_core::{combine, BenchConfig, Logger, ToolId};

pub fn execute(
    config: &BenchConfig,
    results_dir: Option<&Path>,
    output: Option<&Path>,
    logger: &dyn Logger,
) -> anyhow::Result<()> {
    let results_dir = results_dir.unwrap_or(&config.output.results_dir);
    let output = output.unwrap_or(&config.output.aggregate_file);

    let reporter = JsonReporter::open(results_dir);
    let artifacts = reporter.load_artifacts()?;
    logger.info(&format!(
        "Found results for {} of {} tools in {}",
        artifacts.len(),
        ToolId::ALL.len(),
        reporter.output_dir().display()
    ));

    let aggregated = combine(&artifacts)
        .with_context(|| format!("nothing to aggregate in {}", results_dir.display()))?;

    for (key, ratio) in &aggregated.comparisons {
        logger.info(&format!("{}: {:.2}x", key, ratio));
    }

    JsonReporter::save_aggregate(output, &aggregated)?;
    logger.info(&format!("Snapshot written to {}", output.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monobench_core::MemoryLogger;
    use tempfile::TempDir;

    #[test]
    fn test_missing_results_dir_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let results_dir = temp_dir.path().join("reuslts");
        let output = temp_dir.path().join("benchmark-results.json");
        let logger = MemoryLogger::new();

        let result = execute(
            &BenchConfig::default(),
            Some(&results_dir),
            Some(&output),
            &logger,
        );

        assert!(result.is_err());
        assert!(!results_dir.exists());
        assert!(!output.exists());
    }
}
