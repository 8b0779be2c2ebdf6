// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Injected logging.
//!
//! Components receive a `&dyn Logger` instead of consulting a process-wide
//! verbosity flag. The binary hands out a [`TracingLogger`]; tests hand out a
//! [`MemoryLogger`] and assert on what was captured.

use std::fmt;
use std::sync::Mutex;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "debug"),
            Level::Info => write!(f, "info"),
            Level::Warn => write!(f, "warn"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// Sink for pipeline log lines.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards to the `tracing` macros.
///
/// In quiet mode debug and info lines are dropped; warnings and errors are
/// always emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger {
    quiet: bool,
}

impl TracingLogger {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        if self.quiet && level < Level::Warn {
            return;
        }
        match level {
            Level::Debug => tracing::debug!(target: "monobench", "{}", message),
            Level::Info => tracing::info!(target: "monobench", "{}", message),
            Level::Warn => tracing::warn!(target: "monobench", "{}", message),
            Level::Error => tracing::error!(target: "monobench", "{}", message),
        }
    }
}

/// Captures every line in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether some line at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, line)| *l == level && line.contains(needle))
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((level, message.to_string()));
    }
}
