//! Install command implementation.
//!
//! The `devstrap install` command (also the default) probes and installs
//! catalog software.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::InstallArgs;
use crate::config::{load_config, resolve_catalog, DevstrapConfig};
use crate::environment::EnvironmentFacts;
use crate::error::Result;
use crate::provision::{check_prerequisites, Orchestrator, ProvisionOptions, RunReport};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::{OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    config_path: Option<PathBuf>,
    args: InstallArgs,
    runner: Arc<dyn ProcessRunner>,
}

impl InstallCommand {
    pub fn new(config_path: Option<&Path>, args: InstallArgs) -> Self {
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

    pub fn args(&self) -> &InstallArgs {
        &self.args
    }

    fn options(&self, config: &DevstrapConfig) -> ProvisionOptions {
        ProvisionOptions {
            dry_run: self.args.dry_run,
            force: self.args.force,
            lenient_probe: config.settings.lenient_probe,
        }
    }

    /// Run against facts the caller already built.
    pub fn run_with_facts(
        &self,
        config: &DevstrapConfig,
        source: Option<&Path>,
        facts: &EnvironmentFacts,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let catalog = resolve_catalog(config, source)?;
        let selection = catalog.select(facts.platform(), &self.args.software)?;

        if !self.args.dry_run {
            check_prerequisites(facts)?;
        }

        let noun = if selection.len() == 1 {
            "package"
        } else {
            "packages"
        };
        ui.show_header(&format!(
            "Provisioning {} {} on {}",
            selection.len(),
            noun,
            facts.platform()
        ));
        if self.args.dry_run {
            ui.message("Dry run: nothing will be installed");
        }

        let report = Orchestrator::new(facts, self.options(config)).run(&selection, ui);
        Ok(summarize(&report, self.args.dry_run, ui))
    }
}

/// Print the closing summary and pick the exit status.
fn summarize(report: &RunReport, dry_run: bool, ui: &mut dyn UserInterface) -> CommandResult {
    let done = if dry_run {
        format!(
            "{} to install, {} already installed",
            report.would_install(),
            report.already_installed()
        )
    } else {
        format!(
            "{} installed, {} already installed",
            report.installed(),
            report.already_installed()
        )
    };

    if report.has_failures() {
        ui.message(&done);
        ui.error(&format!("Failed: {}", report.failed().join(", ")));
        CommandResult::failure(1)
    } else {
        ui.success(&format!("Done! {}", done));
        CommandResult::success()
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (config, source) = load_config(self.config_path.as_deref())?;

        // Config default_output applies only when no CLI flag was given
        if ui.output_mode() == OutputMode::Normal {
            if let Some(mode) = config.settings.default_output {
                ui.set_output_mode(mode.into());
            }
        }

        let facts = EnvironmentFacts::detect(
            Arc::clone(&self.runner),
            config.settings.download_dir.clone(),
        )?;
        tracing::debug!("Environment: {:?}", facts);

        self.run_with_facts(&config, source.as_deref(), &facts, ui)
    }
}
