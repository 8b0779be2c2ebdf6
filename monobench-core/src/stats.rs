// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result types shared between the harness, the aggregator and the analyzer.
//!
//! All durations are wall-clock milliseconds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ToolId;

/// Timing statistics for one tool's measurement phase.
///
/// Only constructed through [`ToolResult::from_runs`] or
/// [`ToolResult::empty`], so `min`/`max`/`total`/`average` always agree with
/// `runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Arithmetic mean of `runs`
    pub average: f64,
    /// Sum of `runs`
    pub total: f64,
    /// One duration per measured invocation, in run order
    pub runs: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl ToolResult {
    /// All-zero sentinel for a tool that produced no data.
    pub fn empty() -> Self {
        Self {
            average: 0.0,
            total: 0.0,
            runs: Vec::new(),
            min: 0.0,
            max: 0.0,
        }
    }

    /// Compute the statistics over `runs`.
    pub fn from_runs(runs: Vec<f64>) -> Self {
        if runs.is_empty() {
            return Self::empty();
        }

        let total: f64 = runs.iter().sum();
        let min = runs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = runs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = total / runs.len() as f64;

        Self {
            average,
            total,
            runs,
            min,
            max,
        }
    }

    /// Whether this result carries any measurement.
    pub fn has_data(&self) -> bool {
        self.average > 0.0
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-tool result file, written once by the process that benchmarked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolArtifact {
    pub tool: ToolId,
    /// ISO-8601 timestamp of the run
    pub timestamp: String,
    /// Human-readable date of the run
    pub date: String,
    /// Number of measurement runs
    pub runs: usize,
    pub results: ToolResult,
}

impl ToolArtifact {
    pub fn new(
        tool: ToolId,
        timestamp: impl Into<String>,
        date: impl Into<String>,
        results: ToolResult,
    ) -> Self {
        Self {
            tool,
            timestamp: timestamp.into(),
            date: date.into(),
            runs: results.runs.len(),
            results,
        }
    }
}

/// Combined dataset over the whole tool roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub timestamp: String,
    pub date: String,
    pub runs: usize,
    /// Always holds every tool when produced by the aggregator; missing
    /// tools carry the zero sentinel.
    pub tools: BTreeMap<ToolId, ToolResult>,
    /// `<fastest>Vs<Other>` → other.average / fastest.average
    #[serde(default)]
    pub comparisons: BTreeMap<String, f64>,
}

impl AggregatedResult {
    /// Average for `tool`, if it was measured in this snapshot.
    pub fn average(&self, tool: ToolId) -> Option<f64> {
        self.tools
            .get(&tool)
            .filter(|result| result.has_data())
            .map(|result| result.average)
    }

    /// Tools with data, in fixed order.
    pub fn measured_tools(&self) -> Vec<ToolId> {
        ToolId::ALL
            .into_iter()
            .filter(|tool| self.average(*tool).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_runs_invariants() {
        let samples = vec![310.0, 295.5, 402.25, 288.0, 301.0];
        let result = ToolResult::from_runs(samples.clone());

        let sum: f64 = samples.iter().sum();
        assert!((result.total - sum).abs() < 1e-9);
        assert!((result.average - sum / samples.len() as f64).abs() < 1e-9);
        assert_eq!(result.min, 288.0);
        assert_eq!(result.max, 402.25);
        assert_eq!(result.runs, samples);
    }

    #[test]
    fn test_from_runs_single_sample() {
        let result = ToolResult::from_runs(vec![42.0]);
        assert_eq!(result.average, 42.0);
        assert_eq!(result.total, 42.0);
        assert_eq!(result.min, 42.0);
        assert_eq!(result.max, 42.0);
    }

    #[test]
    fn test_empty_sentinel() {
        let result = ToolResult::from_runs(Vec::new());
        assert_eq!(result, ToolResult::empty());
        assert!(!result.has_data());
        assert_eq!(result.min, 0.0);
        assert_eq!(result.max, 0.0);
    }

    #[test]
    fn test_artifact_counts_runs() {
        let artifact = ToolArtifact::new(
            ToolId::Turbo,
            "2025-03-01T10:00:00.000Z",
            "3/1/2025",
            ToolResult::from_runs(vec![1.0, 2.0, 3.0]),
        );
        assert_eq!(artifact.runs, 3);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["tool"], "turbo");
        assert_eq!(json["results"]["total"], 6.0);
    }

    #[test]
    fn test_aggregated_average_skips_zero() {
        let mut tools = BTreeMap::new();
        tools.insert(ToolId::Nx, ToolResult::from_runs(vec![100.0]));
        tools.insert(ToolId::Turbo, ToolResult::empty());
        let aggregated = AggregatedResult {
            timestamp: String::new(),
            date: String::new(),
            runs: 1,
            tools,
            comparisons: BTreeMap::new(),
        };

        assert_eq!(aggregated.average(ToolId::Nx), Some(100.0));
        assert_eq!(aggregated.average(ToolId::Turbo), None);
        assert_eq!(aggregated.average(ToolId::Moon), None);
        assert_eq!(aggregated.measured_tools(), vec![ToolId::Nx]);
    }
}
