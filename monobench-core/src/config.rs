// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Every field has a default, so an absent file is a valid configuration.
//! Any invalid field results in a HardValidationError before a single tool
//! is invoked. Recognised environment options (`CI`,
//! `MONOBENCH_CONCURRENCY`) are applied explicitly by the caller through
//! [`BenchConfig::apply_env`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analyze::Thresholds;
use crate::error::{BenchError, BenchResult, HardValidationError};
use crate::logger::Logger;
use crate::types::ToolId;

/// Environment variable that marks a CI host.
pub const ENV_CI: &str = "CI";
/// Environment variable carrying a concurrency override.
pub const ENV_CONCURRENCY: &str = "MONOBENCH_CONCURRENCY";

const MAX_MEASURE_RUNS: u32 = 1000;
const MAX_TRIALS: u32 = 20;

/// Raw runner section as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunnerConfig {
    #[serde(default = "default_bin_dir")]
    bin_dir: String,
    #[serde(default = "default_prep_runs")]
    prep_runs: u32,
    #[serde(default = "default_measure_runs")]
    measure_runs: u32,
    #[serde(default = "default_max_trials")]
    max_trials: u32,
    #[serde(default)]
    concurrency: Option<u32>,
    #[serde(default)]
    ci: bool,
}

fn default_bin_dir() -> String {
    "node_modules/.bin".to_string()
}

fn default_prep_runs() -> u32 {
    2
}

fn default_measure_runs() -> u32 {
    10
}

fn default_max_trials() -> u32 {
    3
}

impl Default for RawRunnerConfig {
    fn default() -> Self {
        Self {
            bin_dir: default_bin_dir(),
            prep_runs: default_prep_runs(),
            measure_runs: default_measure_runs(),
            max_trials: default_max_trials(),
            concurrency: None,
            ci: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutputConfig {
    #[serde(default = "default_results_dir")]
    results_dir: String,
    #[serde(default = "default_aggregate_file")]
    aggregate_file: String,
}

fn default_results_dir() -> String {
    "results".to_string()
}

fn default_aggregate_file() -> String {
    "results/benchmark-results.json".to_string()
}

impl Default for RawOutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            aggregate_file: default_aggregate_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnalysisConfig {
    #[serde(default = "default_baseline")]
    baseline: String,
    #[serde(default = "default_significance")]
    significance_threshold: f64,
    #[serde(default = "default_regression")]
    regression_threshold: f64,
}

fn default_baseline() -> String {
    "nx".to_string()
}

fn default_significance() -> f64 {
    0.05
}

fn default_regression() -> f64 {
    0.10
}

impl Default for RawAnalysisConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            significance_threshold: default_significance(),
            regression_threshold: default_regression(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    runner: RawRunnerConfig,
    #[serde(default)]
    output: RawOutputConfig,
    #[serde(default)]
    analysis: RawAnalysisConfig,
}

/// Validated runner configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Directory searched first for tool executables.
    pub bin_dir: PathBuf,
    pub prep_runs: u32,
    pub measure_runs: u32,
    pub max_trials: u32,
    /// Explicit concurrency override; always positive when set.
    pub concurrency: Option<u32>,
    pub ci: bool,
}

/// Validated output locations.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub aggregate_file: PathBuf,
}

/// Complete validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub runner: RunnerConfig,
    pub output: OutputConfig,
    pub analysis: Thresholds,
}

impl Default for BenchConfig {
    fn default() -> Self {
        // The built-in defaults always pass validation.
        Self {
            runner: RunnerConfig {
                bin_dir: PathBuf::from(default_bin_dir()),
                prep_runs: default_prep_runs(),
                measure_runs: default_measure_runs(),
                max_trials: default_max_trials(),
                concurrency: None,
                ci: false,
            },
            output: OutputConfig {
                results_dir: PathBuf::from(default_results_dir()),
                aggregate_file: PathBuf::from(default_aggregate_file()),
            },
            analysis: Thresholds::default(),
        }
    }
}

impl BenchConfig {
    /// Overlay the recognised environment options onto this configuration.
    ///
    /// Unparsable or non-positive concurrency values are ignored with a
    /// warning rather than rejected.
    pub fn apply_env<I, K, V>(&mut self, vars: I, logger: &dyn Logger)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_CI => self.runner.ci = is_truthy(value),
                ENV_CONCURRENCY => match parse_override(value) {
                    Some(n) => self.runner.concurrency = Some(n),
                    None => logger.warn(&format!(
                        "Ignoring {}={:?}: expected a positive integer",
                        ENV_CONCURRENCY, value
                    )),
                },
                _ => {}
            }
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Parse a concurrency override; only positive integers are recognised.
pub fn parse_override(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<BenchConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load the file if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> BenchResult<BenchConfig> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_file(path)
        } else {
            Ok(BenchConfig::default())
        }
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<BenchConfig> {
        if content.trim().is_empty() {
            return Self::validate(RawConfig::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> BenchResult<BenchConfig> {
        Ok(BenchConfig {
            runner: Self::validate_runner(raw.runner)?,
            output: Self::validate_output(raw.output)?,
            analysis: Self::validate_analysis(raw.analysis)?,
        })
    }

    fn validate_runner(raw: RawRunnerConfig) -> BenchResult<RunnerConfig> {
        if raw.bin_dir.trim().is_empty() {
            return Err(invalid("bin_dir", raw.bin_dir, "Lookup directory cannot be empty"));
        }

        if raw.prep_runs == 0 {
            return Err(invalid("prep_runs", "0", "Must run at least one prep iteration"));
        }

        if raw.measure_runs == 0 || raw.measure_runs > MAX_MEASURE_RUNS {
            return Err(invalid(
                "measure_runs",
                raw.measure_runs.to_string(),
                format!("Must be between 1 and {}", MAX_MEASURE_RUNS),
            ));
        }

        if raw.max_trials == 0 || raw.max_trials > MAX_TRIALS {
            return Err(invalid(
                "max_trials",
                raw.max_trials.to_string(),
                format!("Must be between 1 and {}", MAX_TRIALS),
            ));
        }

        if raw.concurrency == Some(0) {
            return Err(invalid("concurrency", "0", "Override must be a positive integer"));
        }

        Ok(RunnerConfig {
            bin_dir: PathBuf::from(raw.bin_dir),
            prep_runs: raw.prep_runs,
            measure_runs: raw.measure_runs,
            max_trials: raw.max_trials,
            concurrency: raw.concurrency,
            ci: raw.ci,
        })
    }

    fn validate_output(raw: RawOutputConfig) -> BenchResult<OutputConfig> {
        if raw.results_dir.trim().is_empty() {
            return Err(invalid("results_dir", raw.results_dir, "Cannot be empty"));
        }
        if raw.aggregate_file.trim().is_empty() {
            return Err(invalid("aggregate_file", raw.aggregate_file, "Cannot be empty"));
        }

        Ok(OutputConfig {
            results_dir: PathBuf::from(raw.results_dir),
            aggregate_file: PathBuf::from(raw.aggregate_file),
        })
    }

    fn validate_analysis(raw: RawAnalysisConfig) -> BenchResult<Thresholds> {
        let baseline: ToolId = raw.baseline.parse()?;

        for (field, value) in [
            ("significance_threshold", raw.significance_threshold),
            ("regression_threshold", raw.regression_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(
                    field,
                    value.to_string(),
                    "Must be a fraction in (0, 1]",
                ));
            }
        }

        Ok(Thresholds {
            significance: raw.significance_threshold,
            regression: raw.regression_threshold,
            baseline,
        })
    }
}

fn invalid(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> BenchError {
    HardValidationError::InvalidFieldValue {
        field,
        value: value.into(),
        reason: reason.into(),
    }
    .into()
}
