// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The fixed tool roster.
//!
//! Each tool is described by a [`ToolProfile`]: the build command it runs
//! (with a `{concurrency}` placeholder), the arguments appended on the last
//! retry, an environment overlay and an optional pre-prep hook. Tool-specific
//! behaviour lives in this table, not in the harness.

use std::collections::BTreeMap;

use monobench_core::{CommandSpec, ToolId};

/// Placeholder replaced by the phase's concurrency when rendering commands.
pub const CONCURRENCY_PLACEHOLDER: &str = "{concurrency}";

/// Side effect run once before a tool's prep phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrePrepHook {
    None,
    /// Reset the cache/daemon state owned by another tool.
    ResetCache { owner: ToolId, command: CommandSpec },
}

/// Static description of how to benchmark one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolProfile {
    pub tool: ToolId,
    pub executable: String,
    /// Build arguments; may contain [`CONCURRENCY_PLACEHOLDER`]
    pub arguments: Vec<String>,
    /// Appended on the final trial (e.g. to bypass a locked cache database)
    pub fallback_arguments: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub pre_prep: PrePrepHook,
}

impl ToolProfile {
    /// Profile for `tool` from the built-in table.
    pub fn for_tool(tool: ToolId) -> Self {
        match tool {
            ToolId::Nx => Self::build(
                tool,
                "nx",
                &["run-many", "--target=build", "--all", "--parallel={concurrency}"],
                &["--skip-nx-cache"],
                &[("NX_DAEMON", "true"), ("NX_TUI", "false")],
                PrePrepHook::None,
            ),
            ToolId::Turbo => Self::build(
                tool,
                "turbo",
                &["run", "build", "--concurrency={concurrency}", "--output-logs=errors-only"],
                &["--force"],
                &[("TURBO_TELEMETRY_DISABLED", "1")],
                PrePrepHook::None,
            ),
            // Lerna runs its tasks through Nx and would otherwise pick up the
            // daemon and cache left behind by the Nx benchmark.
            ToolId::Lerna => Self::build(
                tool,
                "lerna",
                &["run", "build", "--concurrency={concurrency}"],
                &["--skip-nx-cache"],
                &[("NX_DAEMON", "true")],
                PrePrepHook::ResetCache {
                    owner: ToolId::Nx,
                    command: CommandSpec::new("nx", ["reset"]),
                },
            ),
            ToolId::Lage => Self::build(
                tool,
                "lage",
                &["build", "--concurrency={concurrency}"],
                &["--no-cache"],
                &[],
                PrePrepHook::None,
            ),
            ToolId::Moon => Self::build(
                tool,
                "moon",
                &["--concurrency", "{concurrency}", "run", ":build"],
                &[],
                &[],
                PrePrepHook::None,
            ),
        }
    }

    /// Profiles for the whole roster, in fixed order.
    pub fn all() -> Vec<Self> {
        ToolId::ALL.into_iter().map(Self::for_tool).collect()
    }

    fn build(
        tool: ToolId,
        executable: &str,
        arguments: &[&str],
        fallback_arguments: &[&str],
        env: &[(&str, &str)],
        pre_prep: PrePrepHook,
    ) -> Self {
        Self {
            tool,
            executable: executable.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            fallback_arguments: fallback_arguments.iter().map(|a| a.to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            pre_prep,
        }
    }

    /// The build command with `concurrency` substituted.
    pub fn command(&self, concurrency: u32) -> CommandSpec {
        let value = concurrency.to_string();
        CommandSpec {
            executable: self.executable.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| arg.replace(CONCURRENCY_PLACEHOLDER, &value))
                .collect(),
        }
    }
}
