// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Merges per-tool artifacts into one [`AggregatedResult`] and ranks the
//! tools against the fastest one.

use std::collections::BTreeMap;

use crate::error::AggregateError;
use crate::stats::{AggregatedResult, ToolArtifact, ToolResult};
use crate::types::ToolId;

/// Key under which the ratio of `other` against `fastest` is stored.
pub fn comparison_key(fastest: ToolId, other: ToolId) -> String {
    format!("{}Vs{}", fastest.as_str(), other.title())
}

/// Combine whatever artifacts are present.
///
/// Tools without an artifact keep the zero sentinel. `runs`, `timestamp`
/// and `date` are taken from the artifact with the latest timestamp
/// (ISO-8601 strings order lexicographically).
pub fn combine(
    artifacts: &BTreeMap<ToolId, ToolArtifact>,
) -> Result<AggregatedResult, AggregateError> {
    let mut tools = BTreeMap::new();
    let mut latest: Option<&ToolArtifact> = None;

    for tool in ToolId::ALL {
        match artifacts.get(&tool) {
            Some(artifact) => {
                tools.insert(tool, artifact.results.clone());
                if latest.map_or(true, |l| artifact.timestamp > l.timestamp) {
                    latest = Some(artifact);
                }
            }
            None => {
                tools.insert(tool, ToolResult::empty());
            }
        }
    }

    let latest = latest.ok_or(AggregateError::NoData)?;

    Ok(AggregatedResult {
        timestamp: latest.timestamp.clone(),
        date: latest.date.clone(),
        runs: latest.runs,
        comparisons: rank(&tools),
        tools,
    })
}

/// Ratios of every measured tool against the fastest one.
///
/// Empty when fewer than two tools have data. On an exact tie for fastest
/// the tool earliest in [`ToolId::ALL`] wins.
pub fn rank(tools: &BTreeMap<ToolId, ToolResult>) -> BTreeMap<String, f64> {
    let eligible: Vec<(ToolId, f64)> = ToolId::ALL
        .into_iter()
        .filter_map(|tool| {
            tools
                .get(&tool)
                .filter(|result| result.has_data())
                .map(|result| (tool, result.average))
        })
        .collect();

    let mut comparisons = BTreeMap::new();
    if eligible.len() < 2 {
        return comparisons;
    }

    let mut fastest = eligible[0];
    for candidate in &eligible[1..] {
        if candidate.1 < fastest.1 {
            fastest = *candidate;
        }
    }

    for (tool, average) in eligible {
        if tool != fastest.0 {
            comparisons.insert(comparison_key(fastest.0, tool), average / fastest.1);
        }
    }

    comparisons
}
