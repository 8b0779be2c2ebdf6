// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! monobench CLI
//!
//! Command-line interface for benchmarking monorepo build tools and
//! comparing successive result sets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use monobench_core::{BenchConfig, ConfigLoader, Logger, ToolId, TracingLogger};
use tracing_subscriber::EnvFilter;

mod commands;

/// Default configuration file, used only when present.
const DEFAULT_CONFIG: &str = "monobench.yaml";

/// monobench - repeatable timing and regression tracking for monorepo build tools
#[derive(Parser)]
#[command(name = "monobench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to monobench.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Benchmark one tool and write its result file
    Run {
        /// Tool to benchmark (nx, turbo, lerna, lage, moon)
        tool: ToolId,

        /// Use the CI concurrency policy
        #[arg(long)]
        ci: bool,

        /// Explicit concurrency for both phases
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        concurrency: Option<u32>,

        /// Number of prep runs
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        prep_runs: Option<u32>,

        /// Number of measured runs
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        measure_runs: Option<u32>,

        /// Directory for per-tool result files
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Combine per-tool result files into one snapshot
    Aggregate {
        /// Directory holding per-tool result files
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Snapshot file to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare the current snapshot against a previous one
    Compare {
        /// Current snapshot (defaults to the configured aggregate file)
        #[arg(long)]
        current: Option<PathBuf>,

        /// Previous snapshot; missing, empty or `{}` means no previous data
        #[arg(long)]
        previous: Option<PathBuf>,
    },

    /// Print the recommended concurrency for this host
    Advise {
        /// Use the CI concurrency policy
        #[arg(long)]
        ci: bool,

        /// Explicit concurrency override
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        concurrency: Option<u32>,

        /// CPU count to assume instead of the detected one
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        cpus: Option<u64>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

/// Load the configuration and overlay the recognised environment options.
fn load_config(cli: &Cli, logger: &dyn Logger) -> anyhow::Result<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => ConfigLoader::load_or_default(DEFAULT_CONFIG)?,
    };
    config.apply_env(std::env::vars(), logger);
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let logger = TracingLogger::new(cli.quiet);

    // Dispatch to command handlers
    match &cli.command {
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Run {
            tool,
            ci,
            concurrency,
            prep_runs,
            measure_runs,
            results_dir,
        } => {
            let config = load_config(&cli, &logger)?;
            let options = commands::run::RunOptions {
                tool: *tool,
                ci: *ci,
                concurrency: *concurrency,
                prep_runs: *prep_runs,
                measure_runs: *measure_runs,
                results_dir: results_dir.clone(),
            };
            commands::run::execute(&config, options, &logger)
        }
        Commands::Aggregate {
            results_dir,
            output,
        } => {
            let config = load_config(&cli, &logger)?;
            commands::aggregate::execute(
                &config,
                results_dir.as_deref(),
                output.as_deref(),
                &logger,
            )
        }
        Commands::Compare { current, previous } => {
            let config = load_config(&cli, &logger)?;
            commands::compare::execute(&config, current.as_deref(), previous.as_deref(), &logger)
        }
        Commands::Advise {
            ci,
            concurrency,
            cpus,
        } => {
            let config = load_config(&cli, &logger)?;
            commands::advise::execute(&config, *ci, *concurrency, *cpus)
        }
    }
}
