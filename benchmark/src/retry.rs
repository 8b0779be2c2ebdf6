// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Bounded retry with a final fallback invocation.
//!
//! A failing command is retried with its original arguments until
//! `max(1, max_trials - 1)` attempts have been made, then invoked one last
//! time with the fallback arguments appended. Whatever that last invocation
//! returns is the result. An always-failing command therefore costs exactly
//! `max_trials` invocations (two when `max_trials <= 1`).

use std::collections::BTreeMap;

use monobench_core::{CommandSpec, Logger};

use crate::process::{CommandRunner, RunOutcome};

/// Retry budget for one logical tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_trials: u32,
}

impl RetryPolicy {
    pub fn new(max_trials: u32) -> Self {
        Self { max_trials }
    }

    pub fn max_trials(&self) -> u32 {
        self.max_trials
    }

    /// Attempts made with the original arguments before falling back.
    fn original_attempts(&self) -> u32 {
        self.max_trials.saturating_sub(1).max(1)
    }

    /// Run `command`, retrying and finally falling back as described in the
    /// module docs.
    pub fn run_with_retry(
        &self,
        runner: &dyn CommandRunner,
        command: &CommandSpec,
        fallback_arguments: &[String],
        env: &BTreeMap<String, String>,
        logger: &dyn Logger,
    ) -> RunOutcome {
        let attempts = self.original_attempts();
        let total = attempts + 1;

        for trial in 1..=attempts {
            logger.debug(&format!("Running `{}` (trial {}/{})", command, trial, total));
            let outcome = runner.run(command, env);
            if outcome.success() {
                return outcome;
            }
            logger.warn(&format!(
                "`{}` failed on trial {}/{}: {}",
                command,
                trial,
                total,
                outcome.describe()
            ));
        }

        let fallback = command.with_appended(fallback_arguments);
        logger.warn(&format!(
            "Final trial {}/{} with fallback arguments: `{}`",
            total, total, fallback
        ));
        let outcome = runner.run(&fallback, env);
        if !outcome.success() {
            logger.warn(&format!(
                "`{}` still failing after {} trials: {}",
                fallback,
                total,
                outcome.describe()
            ));
        }
        outcome
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::scripted::ScriptedRunner;
    use monobench_core::{Level, MemoryLogger};

    fn command() -> CommandSpec {
        CommandSpec::new("nx", ["run-many", "-t", "build"])
    }

    fn fallback() -> Vec<String> {
        vec!["x".to_string()]
    }

    #[test]
    fn test_always_failing_uses_exactly_max_trials() {
        let runner = ScriptedRunner::with_exit_codes([2, 2, 7]);
        let logger = MemoryLogger::new();

        let outcome = RetryPolicy::new(3).run_with_retry(
            &runner,
            &command(),
            &fallback(),
            &BTreeMap::new(),
            &logger,
        );

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], command());
        assert_eq!(calls[1], command());
        assert_eq!(calls[2].arguments, vec!["run-many", "-t", "build", "x"]);
        // The result is the last attempt's, failure included.
        assert_eq!(outcome.exit_status, Some(7));
        assert!(logger.contains(Level::Warn, "still failing"));
    }

    #[test]
    fn test_success_returns_immediately() {
        let runner = ScriptedRunner::with_exit_codes([0]);
        let logger = MemoryLogger::new();

        let outcome = RetryPolicy::new(3).run_with_retry(
            &runner,
            &command(),
            &fallback(),
            &BTreeMap::new(),
            &logger,
        );

        assert!(outcome.success());
        assert_eq!(runner.calls().len(), 1);
        assert_eq!(logger.count(Level::Warn), 0);
    }

    #[test]
    fn test_transient_failure_heals() {
        let runner = ScriptedRunner::with_exit_codes([1, 0]);
        let logger = MemoryLogger::new();

        let outcome = RetryPolicy::new(3).run_with_retry(
            &runner,
            &command(),
            &fallback(),
            &BTreeMap::new(),
            &logger,
        );

        assert!(outcome.success());
        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| !c.arguments.contains(&"x".to_string())));
        assert!(logger.contains(Level::Warn, "database is locked"));
    }

    #[test]
    fn test_fallback_can_succeed() {
        let runner = ScriptedRunner::with_exit_codes([1, 1, 0]);
        let logger = MemoryLogger::new();

        let outcome = RetryPolicy::new(3).run_with_retry(
            &runner,
            &command(),
            &fallback(),
            &BTreeMap::new(),
            &logger,
        );

        assert!(outcome.success());
        assert_eq!(runner.calls().len(), 3);
        assert!(!logger.contains(Level::Warn, "still failing"));
    }

    #[test]
    fn test_single_trial_falls_back_immediately() {
        for max_trials in [0, 1] {
            let runner = ScriptedRunner::with_exit_codes([1, 1]);
            let logger = MemoryLogger::new();

            RetryPolicy::new(max_trials).run_with_retry(
                &runner,
                &command(),
                &fallback(),
                &BTreeMap::new(),
                &logger,
            );

            let calls = runner.calls();
            assert_eq!(calls.len(), 2, "max_trials = {}", max_trials);
            assert_eq!(calls[0], command());
            assert_eq!(calls[1].arguments.last().map(String::as_str), Some("x"));
        }
    }
}
