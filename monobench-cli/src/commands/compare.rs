// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `monobench compare` command - Classify the change between two snapshots.
//!
//! Prints a JSON verdict on stdout for downstream tooling; the per-tool trail
//! goes to the log.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::bail;
use monobench_benchmark::JsonReporter;
use monobench_core::{AggregatedResult, BenchConfig, ChangeAnalyzer, Logger, ToolId};
use serde::Serialize;

#[derive(Serialize)]
struct CompareOutput {
    significant: bool,
    regression: bool,
    current: BTreeMap<ToolId, f64>,
    previous: Option<BTreeMap<ToolId, f64>>,
}

fn averages(snapshot: &AggregatedResult) -> BTreeMap<ToolId, f64> {
    snapshot
        .measured_tools()
        .into_iter()
        .filter_map(|tool| snapshot.average(tool).map(|average| (tool, average)))
        .collect()
}

pub fn execute(
    config: &BenchConfig,
    current: Option<&Path>,
    previous: Option<&Path>,
    logger: &dyn Logger,
) -> anyhow::Result<()> {
    let current_path = current.unwrap_or(&config.output.aggregate_file);
    let Some(current) = JsonReporter::load_snapshot(current_path)? else {
        bail!("No current benchmark data at {}", current_path.display());
    };

    let previous = match previous {
        Some(path) => JsonReporter::load_snapshot(path)?,
        None => None,
    };
    if previous.is_none() {
        logger.info("No previous benchmark data; treating this run as significant");
    }

    let analyzer = ChangeAnalyzer::new(config.analysis);
    let thresholds = analyzer.thresholds();
    logger.debug(&format!(
        "Baseline {}, significance {:.1}%, regression {:.1}%",
        thresholds.baseline,
        thresholds.significance * 100.0,
        thresholds.regression * 100.0
    ));
    let report = analyzer.analyze(&current, previous.as_ref());
    report.log_trail(logger);

    let output = CompareOutput {
        significant: report.significant,
        regression: report.regression,
        current: averages(&current),
        previous: previous.as_ref().map(averages),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
