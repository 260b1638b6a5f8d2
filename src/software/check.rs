//! Declared installation checks.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::environment::expand_home;

/// How to tell that a piece of software is already present.
///
/// ```yaml
/// check: { commands: [zsh] }
/// check: { files: ["~/.oh-my-zsh"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationCheck {
    /// Any of these commands on PATH.
    Commands(Vec<String>),
    /// Any of these paths existing; `~/` is the home directory.
    Files(Vec<String>),
}

impl InstallationCheck {
    /// Configured file paths with `~` expanded against `home`.
    pub fn expanded_files(&self, home: &Path) -> Vec<PathBuf> {
        match self {
            InstallationCheck::Files(files) => {
                files.iter().map(|f| expand_home(f, home)).collect()
            }
            InstallationCheck::Commands(_) => Vec::new(),
        }
    }

    /// Configured command names.
    pub fn commands(&self) -> &[String] {
        match self {
            InstallationCheck::Commands(commands) => commands,
            InstallationCheck::Files(_) => &[],
        }
    }
}
