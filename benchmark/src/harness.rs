// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-tool benchmark harness.
//!
//! Drives one tool through its pre-prep hook, a prep phase whose timings are
//! discarded, and a measurement phase whose wall-clock timings become the
//! tool's [`ToolResult`]. Caches are deliberately left alone between the two
//! phases so the measurement sees cache hits.

use std::time::{Duration, Instant};

use monobench_core::{CommandSpec, Concurrency, Logger, ToolId, ToolResult};

use crate::process::CommandRunner;
use crate::retry::RetryPolicy;
use crate::tools::{PrePrepHook, ToolProfile};

/// Drives tool benchmarks through a [`CommandRunner`].
pub struct ToolBenchmark<'a> {
    runner: &'a dyn CommandRunner,
    retry: RetryPolicy,
    logger: &'a dyn Logger,
}

impl<'a> ToolBenchmark<'a> {
    pub fn new(runner: &'a dyn CommandRunner, retry: RetryPolicy, logger: &'a dyn Logger) -> Self {
        Self {
            runner,
            retry,
            logger,
        }
    }

    /// Benchmark `tool` with explicit prep and measure commands.
    ///
    /// Hooks, fallback arguments and environment come from the tool table.
    pub fn execute(
        &self,
        tool: ToolId,
        prep: &CommandSpec,
        measure: &CommandSpec,
        prep_repeats: u32,
        measure_repeats: u32,
    ) -> ToolResult {
        self.execute_with(
            &ToolProfile::for_tool(tool),
            prep,
            measure,
            prep_repeats,
            measure_repeats,
        )
    }

    /// Benchmark `profile`, rendering its command for each phase's
    /// concurrency.
    pub fn execute_profile(
        &self,
        profile: &ToolProfile,
        concurrency: Concurrency,
        prep_repeats: u32,
        measure_repeats: u32,
    ) -> ToolResult {
        self.execute_with(
            profile,
            &profile.command(concurrency.prep),
            &profile.command(concurrency.measure),
            prep_repeats,
            measure_repeats,
        )
    }

    fn execute_with(
        &self,
        profile: &ToolProfile,
        prep: &CommandSpec,
        measure: &CommandSpec,
        prep_repeats: u32,
        measure_repeats: u32,
    ) -> ToolResult {
        let tool = profile.tool;
        self.run_pre_prep(profile);

        // Prep phase
        self.logger.info(&format!(
            "{}: {} prep run(s) of `{}`",
            tool, prep_repeats, prep
        ));
        for _ in 0..prep_repeats {
            self.retry.run_with_retry(
                self.runner,
                prep,
                &profile.fallback_arguments,
                &profile.env,
                self.logger,
            );
        }

        // Measurement phase
        self.logger.info(&format!(
            "{}: {} measured run(s) of `{}`",
            tool, measure_repeats, measure
        ));
        let mut runs = Vec::with_capacity(measure_repeats as usize);
        for run in 1..=measure_repeats {
            let (outcome, elapsed) = timed(|| {
                self.retry.run_with_retry(
                    self.runner,
                    measure,
                    &profile.fallback_arguments,
                    &profile.env,
                    self.logger,
                )
            });
            let millis = as_millis(elapsed);
            if outcome.success() {
                self.logger.debug(&format!(
                    "{}: run {}/{} took {:.1}ms",
                    tool, run, measure_repeats, millis
                ));
            } else {
                self.logger.warn(&format!(
                    "{}: run {}/{} failed after {:.1}ms ({}); duration still recorded",
                    tool,
                    run,
                    measure_repeats,
                    millis,
                    outcome.describe()
                ));
            }
            runs.push(millis);
        }

        let result = ToolResult::from_runs(runs);
        self.logger.info(&format!(
            "{}: average {:.1}ms (min {:.1}ms, max {:.1}ms)",
            tool, result.average, result.min, result.max
        ));
        result
    }

    /// Run the tool's pre-prep hook; failures are logged and ignored.
    fn run_pre_prep(&self, profile: &ToolProfile) {
        let PrePrepHook::ResetCache { owner, command } = &profile.pre_prep else {
            return;
        };

        self.logger.info(&format!(
            "{}: resetting {} state with `{}`",
            profile.tool, owner, command
        ));
        let outcome = self.runner.run(command, &profile.env);
        if !outcome.success() {
            self.logger.warn(&format!(
                "{}: `{}` failed ({}); continuing",
                profile.tool,
                command,
                outcome.describe()
            ));
        }
    }
}

/// Measure the execution time of a closure.
pub fn timed<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    (result, elapsed)
}

/// Duration as fractional milliseconds.
pub fn as_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
