// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Change analysis between two aggregated snapshots.
//!
//! Both checks are pure functions of the two snapshots. Any ratio whose
//! denominator would be zero is "not comparable" and never contributes a
//! positive finding.

use serde::{Deserialize, Serialize};

use crate::logger::Logger;
use crate::stats::AggregatedResult;
use crate::types::ToolId;

/// Decision thresholds, as fractions of the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Per-tool average change above which a snapshot is significant
    pub significance: f64,
    /// Baseline slow-down (or ratio loss) above which a regression is flagged
    pub regression: f64,
    /// Tool whose performance is tracked for regressions
    pub baseline: ToolId,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significance: 0.05,
            regression: 0.10,
            baseline: ToolId::Nx,
        }
    }
}

/// Numeric trail for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolChange {
    pub tool: ToolId,
    pub current_average: f64,
    pub previous_average: Option<f64>,
    /// `(current - previous) / previous`, when comparable
    pub relative_change: Option<f64>,
}

/// Outcome of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub significant: bool,
    pub regression: bool,
    pub tools: Vec<ToolChange>,
}

impl ChangeReport {
    /// Write the per-tool trail and the verdict to `logger`.
    pub fn log_trail(&self, logger: &dyn Logger) {
        for change in &self.tools {
            let line = match (change.previous_average, change.relative_change) {
                (Some(previous), Some(delta)) => format!(
                    "{}: {:.1}ms (previous {:.1}ms, {:+.1}%)",
                    change.tool,
                    change.current_average,
                    previous,
                    delta * 100.0
                ),
                _ => format!(
                    "{}: {:.1}ms (no comparable previous data)",
                    change.tool, change.current_average
                ),
            };
            logger.info(&line);
        }
        logger.info(&format!(
            "significant={} regression={}",
            self.significant, self.regression
        ));
    }
}

/// Relative change of `current` against `previous`; `None` when the
/// denominator is zero or either value is not finite.
fn relative_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous)
}

/// Stateless comparator configured with its thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeAnalyzer {
    thresholds: Thresholds,
}

impl ChangeAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Compare `current` against `previous`.
    ///
    /// With no previous snapshot the change is always significant and never
    /// a regression.
    pub fn analyze(
        &self,
        current: &AggregatedResult,
        previous: Option<&AggregatedResult>,
    ) -> ChangeReport {
        let tools = self.tool_changes(current, previous);

        let Some(previous) = previous else {
            return ChangeReport {
                significant: true,
                regression: false,
                tools,
            };
        };

        ChangeReport {
            significant: self.is_significant(current, previous),
            regression: self.is_regression(current, previous),
            tools,
        }
    }

    fn tool_changes(
        &self,
        current: &AggregatedResult,
        previous: Option<&AggregatedResult>,
    ) -> Vec<ToolChange> {
        current
            .measured_tools()
            .into_iter()
            .filter_map(|tool| {
                let current_average = current.average(tool)?;
                let previous_average = previous.and_then(|p| p.average(tool));
                Some(ToolChange {
                    tool,
                    current_average,
                    previous_average,
                    relative_change: previous_average
                        .and_then(|prev| relative_change(current_average, prev)),
                })
            })
            .collect()
    }

    /// A tool new to this snapshot, or any comparable average moving by
    /// more than the significance threshold.
    pub fn is_significant(&self, current: &AggregatedResult, previous: &AggregatedResult) -> bool {
        current.measured_tools().into_iter().any(|tool| {
            let Some(previous_result) = previous.tools.get(&tool) else {
                return true;
            };
            let Some(current_average) = current.average(tool) else {
                return false;
            };
            relative_change(current_average, previous_result.average)
                .map_or(false, |delta| delta.abs() > self.thresholds.significance)
        })
    }

    /// The baseline tool slowed down by more than the regression threshold,
    /// or some ratio shared by both snapshots shrank by more than it.
    ///
    /// A baseline missing from either snapshot is not comparable and never a
    /// regression.
    pub fn is_regression(&self, current: &AggregatedResult, previous: &AggregatedResult) -> bool {
        let baseline = self.thresholds.baseline;
        let (Some(current_baseline), Some(previous_baseline)) =
            (current.average(baseline), previous.average(baseline))
        else {
            return false;
        };

        let baseline_slower = relative_change(current_baseline, previous_baseline)
            .map_or(false, |delta| delta > self.thresholds.regression);
        if baseline_slower {
            return true;
        }

        current.comparisons.iter().any(|(key, ratio)| {
            previous
                .comparisons
                .get(key)
                .and_then(|previous_ratio| relative_change(*ratio, *previous_ratio))
                .map_or(false, |delta| delta < -self.thresholds.regression)
        })
    }
}
