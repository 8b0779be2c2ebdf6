// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `monobench validate` command - Validate configuration file.

use std::path::Path;

use monobench_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Runner Settings:");
            println!("  Bin Directory:      {}", config.runner.bin_dir.display());
            println!("  Prep Runs:          {}", config.runner.prep_runs);
            println!("  Measure Runs:       {}", config.runner.measure_runs);
            println!("  Max Trials:         {}", config.runner.max_trials);
            match config.runner.concurrency {
                Some(n) => println!("  Concurrency:        {}", n),
                None => println!("  Concurrency:        auto"),
            }
            println!("  CI Mode:            {}", config.runner.ci);
            println!();
            println!("Output:");
            println!("  Results Directory:  {}", config.output.results_dir.display());
            println!("  Aggregate File:     {}", config.output.aggregate_file.display());
            println!();
            println!("Analysis:");
            println!("  Baseline Tool:      {}", config.analysis.baseline);
            println!(
                "  Significance:       {:.1}%",
                config.analysis.significance * 100.0
            );
            println!(
                "  Regression:         {:.1}%",
                config.analysis.regression * 100.0
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
