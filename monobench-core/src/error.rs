//! Custom error types for monobench.
//!
//! Explicit enum error types throughout the library crates.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the benchmark pipeline.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Aggregation Errors
    // =========================================================================
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration or input values. These stop the pipeline before
/// any tool is invoked.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown tool: {name} (expected one of nx, turbo, lerna, lage, moon)")]
    UnknownTool { name: String },
}

/// Failures while merging per-tool results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No benchmark data found: none of the tools produced a result")]
    NoData,
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
