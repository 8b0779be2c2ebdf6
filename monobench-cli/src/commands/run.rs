// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `monobench run` command - Benchmark one tool.

use std::path::PathBuf;

use monobench_benchmark::{JsonReporter, ProcessRunner, RetryPolicy, ToolBenchmark, ToolProfile};
use monobench_core::{recommend, BenchConfig, Logger, ToolId};

/// Command-line overrides for a single run.
pub struct RunOptions {
    pub tool: ToolId,
    pub ci: bool,
    pub concurrency: Option<u32>,
    pub prep_runs: Option<u32>,
    pub measure_runs: Option<u32>,
    pub results_dir: Option<PathBuf>,
}

pub fn execute(
    config: &BenchConfig,
    options: RunOptions,
    logger: &dyn Logger,
) -> anyhow::Result<()> {
    let runner_config = &config.runner;
    let is_ci = options.ci || runner_config.ci;
    let prep_runs = options.prep_runs.unwrap_or(runner_config.prep_runs);
    let measure_runs = options.measure_runs.unwrap_or(runner_config.measure_runs);
    let results_dir = options
        .results_dir
        .unwrap_or_else(|| config.output.results_dir.clone());

    let cpus = num_cpus::get();
    let concurrency = recommend(cpus, is_ci, options.concurrency.or(runner_config.concurrency));
    logger.info(&format!(
        "Benchmarking {} on {} CPUs (ci: {}, prep concurrency: {}, measure concurrency: {})",
        options.tool, cpus, is_ci, concurrency.prep, concurrency.measure
    ));

    // Fail before spending minutes on the tool if the output is unwritable.
    let reporter = JsonReporter::new(&results_dir)?;

    let runner = ProcessRunner::new(&runner_config.bin_dir);
    let retry = RetryPolicy::new(runner_config.max_trials);
    logger.debug(&format!(
        "Resolving executables from {} with up to {} trial(s) per invocation",
        runner.bin_dir().display(),
        retry.max_trials()
    ));
    let bench = ToolBenchmark::new(&runner, retry, logger);
    let result = bench.execute_profile(
        &ToolProfile::for_tool(options.tool),
        concurrency,
        prep_runs,
        measure_runs,
    );

    let path = reporter.save_artifact(&JsonReporter::stamp(options.tool, result))?;
    logger.info(&format!("Results written to {}", path.display()));
    Ok(())
}
