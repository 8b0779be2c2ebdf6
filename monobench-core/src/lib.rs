//! monobench Core Library
//!
//! Data model and decision logic for monorepo build-tool benchmarks:
//! tool roster, configuration, concurrency advice, result aggregation and
//! change analysis. Nothing in this crate spawns processes or touches the
//! result files; see `monobench-benchmark` for that.

pub mod aggregate;
pub mod analyze;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logger;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use aggregate::{combine, comparison_key};
pub use analyze::{ChangeAnalyzer, ChangeReport, Thresholds, ToolChange};
pub use concurrency::{recommend, Concurrency};
pub use config::{BenchConfig, ConfigLoader, OutputConfig, RunnerConfig};
pub use error::{AggregateError, BenchError, BenchResult, HardValidationError};
pub use logger::{Level, Logger, MemoryLogger, TracingLogger};
pub use stats::{AggregatedResult, ToolArtifact, ToolResult};
pub use types::{CommandSpec, ToolId};
