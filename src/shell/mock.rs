//! Recording process runner for tests.
//!
//! `MockRunner` never spawns anything. Every command succeeds with empty
//! output unless a rule registered on the runner says otherwise, and every
//! invocation is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use devstrap::shell::{MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new()
//!     .with_commands(&["apt"])
//!     .fail_on("snap list");
//!
//! assert!(runner.command_exists("apt"));
//! assert!(runner.run_captured(&["snap", "list", "code"]).is_err());
//! assert!(runner.run_captured(&["apt", "--version"]).is_ok());
//! assert_eq!(runner.calls().len(), 2);
//! ```

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{DevstrapError, Result};

use super::command::{format_command, CommandOptions, CommandResult, ProcessRunner};

#[derive(Debug, Clone)]
enum Rule {
    Fail { prefix: String, code: i32, stderr: String },
    Error { prefix: String },
    Output { prefix: String, stdout: String },
}

impl Rule {
    fn prefix(&self) -> &str {
        match self {
            Rule::Fail { prefix, .. } | Rule::Error { prefix } | Rule::Output { prefix, .. } => {
                prefix
            }
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The command line, rendered with [`format_command`].
    pub command: String,
    /// Working directory, if one was set.
    pub cwd: Option<std::path::PathBuf>,
    /// Whether output was captured.
    pub captured: bool,
}

/// Process runner that records calls and answers from configured rules.
#[derive(Debug, Default)]
pub struct MockRunner {
    present: HashSet<String>,
    missing: HashSet<String>,
    rules: Vec<Rule>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRunner {
    /// Create a runner where no commands exist on PATH and every run succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark commands as present on PATH.
    pub fn with_commands(mut self, commands: &[&str]) -> Self {
        self.present.extend(commands.iter().map(|c| c.to_string()));
        self
    }

    /// Make spawning `program` fail with [`DevstrapError::CommandNotFound`].
    pub fn missing_program(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Commands starting with `prefix` exit with status 1.
    pub fn fail_on(self, prefix: &str) -> Self {
        self.fail_with(prefix, 1, "")
    }

    /// Commands starting with `prefix` exit with `code` and print `stderr`.
    pub fn fail_with(mut self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.rules.push(Rule::Fail {
            prefix: prefix.to_string(),
            code,
            stderr: stderr.to_string(),
        });
        self
    }

    /// Commands starting with `prefix` fail with an unexpected IO error.
    pub fn error_on(mut self, prefix: &str) -> Self {
        self.rules.push(Rule::Error {
            prefix: prefix.to_string(),
        });
        self
    }

    /// Commands starting with `prefix` succeed and print `stdout`.
    pub fn output_on(mut self, prefix: &str, stdout: &str) -> Self {
        self.rules.push(Rule::Output {
            prefix: prefix.to_string(),
            stdout: stdout.to_string(),
        });
        self
    }

    /// All recorded invocations, in order.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// All recorded command lines, in order.
    pub fn calls(&self) -> Vec<String> {
        self.recorded().into_iter().map(|c| c.command).collect()
    }

    /// Recorded command lines starting with `prefix`.
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// Whether a command line equal to `command` was run.
    pub fn was_run(&self, command: &str) -> bool {
        self.calls().iter().any(|c| c == command)
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
        let command = format_command(argv);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                command: command.clone(),
                cwd: options.cwd.clone(),
                captured: options.capture,
            });
        }

        if let Some(program) = argv.first() {
            if self.missing.contains(program) {
                return Err(DevstrapError::CommandNotFound {
                    program: program.clone(),
                });
            }
        }

        // Last matching rule wins so tests can override broad rules.
        let rule = self
            .rules
            .iter()
            .rev()
            .find(|r| command.starts_with(r.prefix()));

        match rule {
            Some(Rule::Fail { code, stderr, .. }) => Err(DevstrapError::ProcessFailed {
                command,
                code: Some(*code),
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            Some(Rule::Error { .. }) => Err(DevstrapError::Io(std::io::Error::other(format!(
                "simulated failure running {command}"
            )))),
            Some(Rule::Output { stdout, .. }) => Ok(CommandResult::success(
                stdout.clone(),
                String::new(),
                Duration::ZERO,
            )),
            None => Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            )),
        }
    }

    fn command_exists(&self, program: &str) -> bool {
        self.present.contains(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_by_default_and_records() {
        let runner = MockRunner::new();
        runner.run_captured(&["brew", "install", "zsh"]).unwrap();

        assert_eq!(runner.calls(), vec!["brew install zsh"]);
        assert!(runner.recorded()[0].captured);
    }

    #[test]
    fn later_rules_override_earlier_ones() {
        let runner = MockRunner::new()
            .fail_on("snap")
            .output_on("snap list code", "code 1.0");

        let result = runner.run_captured(&["snap", "list", "code"]).unwrap();
        assert_eq!(result.stdout, "code 1.0");
        assert!(runner.run_captured(&["snap", "list", "zoom"]).is_err());
    }

    #[test]
    fn missing_program_is_command_not_found() {
        let runner = MockRunner::new().missing_program("flatpak");
        let err = runner.run_captured(&["flatpak", "info", "x"]).unwrap_err();
        assert!(matches!(err, DevstrapError::CommandNotFound { .. }));
    }

    #[test]
    fn error_rule_is_not_a_negative_probe() {
        let runner = MockRunner::new().error_on("brew list");
        let err = runner.run_captured(&["brew", "list", "--formula", "zsh"]).unwrap_err();
        assert!(!err.is_negative_probe());
    }

    #[test]
    fn calls_matching_filters_by_prefix() {
        let runner = MockRunner::new();
        runner.run_captured(&["sudo", "apt", "install", "zsh"]).unwrap();
        runner.run_captured(&["brew", "list"]).unwrap();

        assert_eq!(runner.calls_matching("sudo"), vec!["sudo apt install zsh"]);
        assert!(runner.was_run("brew list"));
    }
}
