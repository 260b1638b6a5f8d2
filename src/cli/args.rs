//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Running `devstrap` with no
//! subcommand installs, so the install arguments are also accepted at the
//! top level.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// devstrap - Install your workstation software, whatever the package manager.
#[derive(Debug, Parser)]
#[command(name = "devstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to config file (overrides ~/.config/devstrap/config.yml)
    #[arg(short, long, global = true, env = "DEVSTRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stream installer output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub install: InstallArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install missing software (default if no command specified)
    Install(InstallArgs),

    /// List catalog entries and whether they are installed
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Software to install, by id or name (default: everything for this platform)
    #[arg(value_name = "SOFTWARE")]
    pub software: Vec<String>,

    /// Show what would be installed without running anything
    #[arg(long, alias = "check")]
    pub dry_run: bool,

    /// Install even if the software looks installed already
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Include entries for other platforms
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
