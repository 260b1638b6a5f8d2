//! List command implementation.
//!
//! The `devstrap list` command shows catalog entries for this platform and
//! whether each one is installed.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::cli::args::ListArgs;
use crate::config::{load_config, resolve_catalog};
use crate::environment::{EnvironmentFacts, Platform};
use crate::error::Result;
use crate::provision::InstalledStateProber;
use crate::shell::{ProcessRunner, SystemRunner};
use crate::software::{Category, SoftwareDescriptor};
use crate::ui::{DevstrapTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Installed state as shown by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    Installed,
    Missing,
    /// No check applies, or every check failed unexpectedly.
    Unknown,
    /// Not available on this platform; never probed.
    Unsupported,
}

impl InstallState {
    fn marker(&self) -> &'static str {
        match self {
            InstallState::Installed => "✓",
            InstallState::Missing => "✗",
            InstallState::Unknown => "?",
            InstallState::Unsupported => "-",
        }
    }
}

/// One row of `list` output.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub platforms: Vec<Platform>,
    pub state: InstallState,
}

/// The list command implementation.
pub struct ListCommand {
    config_path: Option<PathBuf>,
    args: ListArgs,
    runner: Arc<dyn ProcessRunner>,
}

impl ListCommand {
    pub fn new(config_path: Option<&Path>, args: ListArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
            runner: Arc::new(SystemRunner::new()),
        }
    }

    /// Use a different process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    /// Build the rows for `catalog` on the host described by `facts`.
    pub fn entries(
        &self,
        catalog: &Catalog,
        facts: &EnvironmentFacts,
        lenient: bool,
    ) -> Vec<ListEntry> {
        let prober = InstalledStateProber::new(facts, lenient);
        catalog
            .entries()
            .iter()
            .filter(|d| self.args.all || d.supports(facts.platform()))
            .map(|d| ListEntry {
                id: d.id(),
                name: d.name.clone(),
                category: d.category,
                platforms: d.platforms.clone(),
                state: probe_state(&prober, d, facts.platform()),
            })
            .collect()
    }

    fn render(&self, entries: &[ListEntry], ui: &mut dyn UserInterface) -> Result<()> {
        if self.args.json {
            let json = serde_json::to_string_pretty(entries).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(());
        }

        let theme = DevstrapTheme::detect();
        let width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0);
        let mut category = None;
        for entry in entries {
            if category != Some(entry.category) {
                category = Some(entry.category);
                let title = match entry.category {
                    Category::Cli => "Command line:",
                    Category::Ui => "Desktop applications:",
                };
                ui.message(&format!("  {}", theme.highlight.apply_to(title)));
            }
            let marker = match entry.state {
                InstallState::Installed => theme.success.apply_to(entry.state.marker()),
                InstallState::Missing => theme.error.apply_to(entry.state.marker()),
                _ => theme.dim.apply_to(entry.state.marker()),
            };
            ui.message(&format!(
                "    {} {:<width$}  {}",
                marker,
                entry.id,
                theme.dim.apply_to(&entry.name),
                width = width
            ));
        }
        Ok(())
    }
}

fn probe_state(
    prober: &InstalledStateProber<'_>,
    descriptor: &SoftwareDescriptor,
    platform: Platform,
) -> InstallState {
    if !descriptor.supports(platform) {
        return InstallState::Unsupported;
    }
    match prober.is_installed(descriptor) {
        Ok(true) => InstallState::Installed,
        Ok(false) => InstallState::Missing,
        Err(e) => {
            tracing::debug!("{}: {}", descriptor.name, e);
            InstallState::Unknown
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (config, source) = load_config(self.config_path.as_deref())?;
        let catalog = resolve_catalog(&config, source.as_deref())?;
        let facts = EnvironmentFacts::detect(
            Arc::clone(&self.runner),
            config.settings.download_dir.clone(),
        )?;

        let entries = self.entries(&catalog, &facts, config.settings.lenient_probe);
        self.render(&entries, ui)?;
        Ok(CommandResult::success())
    }
}
