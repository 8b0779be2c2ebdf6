// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON persistence for benchmark results.
//!
//! One artifact per tool (`<results_dir>/<tool>.json`), written once by the
//! process that benchmarked it, plus the aggregated snapshot consumed by the
//! comparator. A missing per-tool file means "no data"; a file that exists
//! but does not parse is an error.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat, Utc};
use monobench_core::{AggregatedResult, ToolArtifact, ToolId, ToolResult};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while reading or writing result files.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to access result file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed result file {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Reads and writes result files under one directory.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a reporter for `output_dir`, creating the directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Open an existing results directory for reading without creating it.
    ///
    /// A directory that does not exist simply holds no artifacts.
    pub fn open(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Deterministic location of a tool's artifact.
    pub fn artifact_path(&self, tool: ToolId) -> PathBuf {
        self.output_dir.join(format!("{}.json", tool))
    }

    /// Wrap `results` in an artifact stamped with the current time.
    pub fn stamp(tool: ToolId, results: ToolResult) -> ToolArtifact {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let date = Local::now().format("%-m/%-d/%Y").to_string();
        ToolArtifact::new(tool, timestamp, date, results)
    }

    /// Save a tool artifact. Returns the path written.
    pub fn save_artifact(&self, artifact: &ToolArtifact) -> Result<PathBuf, ReporterError> {
        let path = self.artifact_path(artifact.tool);
        write_json(&path, artifact)?;
        Ok(path)
    }

    /// Load every artifact present; tools without a file are skipped.
    pub fn load_artifacts(&self) -> Result<BTreeMap<ToolId, ToolArtifact>, ReporterError> {
        let mut artifacts = BTreeMap::new();

        for tool in ToolId::ALL {
            let path = self.artifact_path(tool);
            if !path.exists() {
                continue;
            }

            let content = fs::read_to_string(&path)?;
            let artifact: ToolArtifact =
                serde_json::from_str(&content).map_err(|e| ReporterError::Malformed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;

            if artifact.tool != tool {
                return Err(ReporterError::Malformed {
                    path,
                    message: format!("expected results for {}, found {}", tool, artifact.tool),
                });
            }

            artifacts.insert(tool, artifact);
        }

        Ok(artifacts)
    }

    /// Save the aggregated snapshot to `path`.
    pub fn save_aggregate(
        path: impl AsRef<Path>,
        result: &AggregatedResult,
    ) -> Result<(), ReporterError> {
        write_json(path.as_ref(), result)
    }

    /// Load a snapshot for comparison.
    ///
    /// A missing file, an empty file and `{}` are all the "no data"
    /// placeholder and yield `None`. Anything else must parse.
    pub fn load_snapshot(
        path: impl AsRef<Path>,
    ) -> Result<Option<AggregatedResult>, ReporterError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let malformed = |message: String| ReporterError::Malformed {
            path: path.to_path_buf(),
            message,
        };

        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
        if value.as_object().is_some_and(|object| object.is_empty()) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| malformed(e.to_string()))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReporterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path().join("results")).unwrap();

        let artifact = JsonReporter::stamp(ToolId::Lage, ToolResult::from_runs(vec![1.0, 3.0]));
        let path = reporter.save_artifact(&artifact).unwrap();
        assert_eq!(path, temp_dir.path().join("results").join("lage.json"));

        let loaded = reporter.load_artifacts().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&ToolId::Lage], artifact);
    }

    #[test]
    fn test_stamp_is_iso8601() {
        let artifact = JsonReporter::stamp(ToolId::Nx, ToolResult::empty());
        assert!(artifact.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&artifact.timestamp).is_ok());
        assert_eq!(artifact.runs, 0);
    }

    #[test]
    fn test_malformed_artifact_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();
        fs::write(reporter.artifact_path(ToolId::Turbo), "{ not json").unwrap();

        assert!(matches!(
            reporter.load_artifacts(),
            Err(ReporterError::Malformed { .. })
        ));
    }

    #[test]
    fn test_artifact_for_wrong_tool_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();
        let artifact = JsonReporter::stamp(ToolId::Nx, ToolResult::from_runs(vec![1.0]));
        write_json(&reporter.artifact_path(ToolId::Moon), &artifact).unwrap();

        let err = reporter.load_artifacts().unwrap_err();
        assert!(err.to_string().contains("expected results for moon"));
    }

    #[test]
    fn test_snapshot_placeholders() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let empty = temp_dir.path().join("empty.json");
        let braces = temp_dir.path().join("braces.json");
        fs::write(&empty, "  \n").unwrap();
        fs::write(&braces, "{}").unwrap();

        assert!(JsonReporter::load_snapshot(&missing).unwrap().is_none());
        assert!(JsonReporter::load_snapshot(&empty).unwrap().is_none());
        assert!(JsonReporter::load_snapshot(&braces).unwrap().is_none());
    }

    #[test]
    fn test_malformed_snapshot_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("previous.json");
        fs::write(&path, r#"{"timestamp": "x", "tools": 12}"#).unwrap();

        assert!(matches!(
            JsonReporter::load_snapshot(&path),
            Err(ReporterError::Malformed { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_is_reported() {
        let artifact = JsonReporter::stamp(ToolId::Nx, ToolResult::from_runs(vec![1.0, 2.0]));

        let result = write_json(Path::new("/dev/full"), &artifact);
        assert!(matches!(result, Err(ReporterError::Io(_))));
    }

    #[test]
    fn test_open_does_not_create_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("no-such-results");

        let reporter = JsonReporter::open(&missing);
        assert_eq!(reporter.output_dir(), missing.as_path());
        assert!(reporter.load_artifacts().unwrap().is_empty());
        assert!(!missing.exists());
    }
}
