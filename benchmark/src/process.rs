// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Blocking execution of one external command.
//!
//! Executables are looked up in a fixed directory first (typically
//! `node_modules/.bin`) and fall back to the `PATH` of the host. Nothing here
//! retries; see [`crate::retry`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use monobench_core::CommandSpec;
use serde::{Deserialize, Serialize};

/// Everything observed about one finished (or never started) process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Exit code; `None` when killed by a signal or never spawned
    pub exit_status: Option<i32>,
    /// Name of the terminating signal, if any
    pub signal: Option<String>,
    pub stdout: String,
    pub stderr: String,
    /// Executor-level failure detail when the process could not be spawned
    pub spawn_error: Option<String>,
}

impl RunOutcome {
    /// Outcome for a process that could not be started.
    pub fn spawn_failure(command: &CommandSpec, error: &std::io::Error) -> Self {
        let detail = format!("Failed to spawn {}: {}", command.executable, error);
        Self {
            exit_status: None,
            signal: None,
            stdout: String::new(),
            stderr: detail.clone(),
            spawn_error: Some(detail),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }

    /// One-line description suitable for a warning.
    pub fn describe(&self) -> String {
        if let Some(error) = &self.spawn_error {
            return error.clone();
        }
        let status = match (&self.exit_status, &self.signal) {
            (Some(code), _) => format!("exit status {}", code),
            (None, Some(signal)) => format!("terminated by {}", signal),
            (None, None) => "unknown status".to_string(),
        };
        match last_line(&self.stderr) {
            Some(line) => format!("{}: {}", status, line),
            None => status,
        }
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

/// Executes commands; the seam that tests replace with a scripted runner.
pub trait CommandRunner {
    /// Run `command` to completion with `env` overlaid on the inherited
    /// environment.
    fn run(&self, command: &CommandSpec, env: &BTreeMap<String, String>) -> RunOutcome;
}

/// Runs real child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    bin_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// `bin_dir/<executable>` when it exists, otherwise the bare name.
    pub fn resolve(&self, executable: &str) -> PathBuf {
        let candidate = self.bin_dir.join(executable);
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(executable)
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandSpec, env: &BTreeMap<String, String>) -> RunOutcome {
        let program = self.resolve(&command.executable);

        let output = Command::new(&program)
            .args(&command.arguments)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match output {
            Ok(output) => RunOutcome {
                exit_status: output.status.code(),
                signal: signal_name(&output.status),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                spawn_error: None,
            },
            Err(e) => RunOutcome::spawn_failure(command, &e),
        }
    }
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    let raw = status.signal()?;
    Some(match Signal::try_from(raw) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => format!("signal {}", raw),
    })
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> Option<String> {
    None
}
