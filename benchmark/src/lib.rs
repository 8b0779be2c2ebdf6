// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! monobench Benchmark Runner
//!
//! Executes monorepo build tools and records how long they take.
//!
//! # Pipeline
//!
//! - **Process**: one blocking child process per invocation
//! - **Retry**: bounded retries with a final fallback-argument attempt
//! - **Tools**: the fixed roster with per-tool commands and pre-prep hooks
//! - **Harness**: prep phase (discarded) then measurement phase (timed)
//!
//! # Data Output
//!
//! Each tool run writes `<results_dir>/<tool>.json`; the aggregated snapshot
//! is written by [`JsonReporter::save_aggregate`].

pub mod harness;
pub mod process;
pub mod reporter;
pub mod retry;
pub mod tools;

pub use harness::ToolBenchmark;
pub use process::{CommandRunner, ProcessRunner, RunOutcome};
pub use reporter::{JsonReporter, ReporterError};
pub use retry::RetryPolicy;
pub use tools::{PrePrepHook, ToolProfile};
