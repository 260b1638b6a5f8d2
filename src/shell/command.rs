//! External command execution.
//!
//! Everything devstrap does to the host goes through a [`ProcessRunner`].
//! [`SystemRunner`] spawns real processes; tests substitute
//! [`MockRunner`](super::MockRunner).

use crate::error::{DevstrapError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr. When false the child inherits the
    /// terminal, including stdin, so `sudo` can prompt.
    pub capture: bool,
}

impl CommandOptions {
    /// Options for a silent, captured invocation.
    pub fn captured() -> Self {
        Self {
            capture: true,
            ..Default::default()
        }
    }

    /// Set the working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }
}

/// Runs external commands.
///
/// Implementations must be shareable across threads: the installed-state
/// prober fans checks out concurrently.
pub trait ProcessRunner: Send + Sync {
    /// Run `argv` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// - [`DevstrapError::CommandNotFound`] if `argv[0]` cannot be spawned
    ///   because it does not exist
    /// - [`DevstrapError::ProcessFailed`] if it exits non-zero, carrying
    ///   whatever output was captured
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult>;

    /// Whether `program` resolves to an executable on PATH.
    fn command_exists(&self, program: &str) -> bool;

    /// Run a command silently, capturing its output.
    fn run_captured(&self, argv: &[&str]) -> Result<CommandResult> {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        self.run(&argv, &CommandOptions::captured())
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
        let Some((program, args)) = argv.split_first() else {
            return Err(anyhow::anyhow!("refusing to run an empty command").into());
        };
        let rendered = format_command(argv);
        tracing::debug!("Running: {}", rendered);

        let start = Instant::now();
        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        if options.capture {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DevstrapError::CommandNotFound {
                    program: program.clone(),
                }
            } else {
                DevstrapError::Io(e)
            }
        })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            tracing::debug!(
                "Command exited with {:?} after {:?}: {}",
                output.status.code(),
                duration,
                rendered
            );
            Err(DevstrapError::ProcessFailed {
                command: rendered,
                code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }

    fn command_exists(&self, program: &str) -> bool {
        if program.contains(std::path::MAIN_SEPARATOR) {
            let path = Path::new(program);
            return path.is_file() && is_executable(path);
        }
        resolve_tool_path(program, &parse_system_path()).is_some()
    }
}

/// Render an argv for display, quoting arguments that contain whitespace.
pub fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                format!("'{}'", arg.replace('\'', r"'\''"))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does not shell
/// out to `which` or `command -v`.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
