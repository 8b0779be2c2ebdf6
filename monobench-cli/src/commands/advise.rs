// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `monobench advise` command - Print the recommended concurrency.

use monobench_core::{recommend, BenchConfig};

pub fn execute(
    config: &BenchConfig,
    ci: bool,
    concurrency: Option<u32>,
    cpus: Option<u64>,
) -> anyhow::Result<()> {
    let cpus = match cpus {
        Some(n) => usize::try_from(n)?,
        None => num_cpus::get(),
    };
    let recommendation = recommend(
        cpus,
        ci || config.runner.ci,
        concurrency.or(config.runner.concurrency),
    );
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
