//! Provisioning loop.
//!
//! Software is handled one entry at a time, in catalog order: probe, then
//! resolve and install (or plan, for a dry run). One entry failing never
//! stops the others.

use crate::environment::{require_tool, EnvironmentFacts};
use crate::error::{DevstrapError, Result};
use crate::software::SoftwareDescriptor;
use crate::ui::UserInterface;

use super::executor::{plan, Executor};
use super::prober::InstalledStateProber;
use super::resolver::resolve;

/// Tools that must be on PATH before anything runs.
pub const PREREQUISITES: &[&str] = &["curl"];

/// Fail early if a prerequisite tool is missing.
pub fn check_prerequisites(facts: &EnvironmentFacts) -> Result<()> {
    for tool in PREREQUISITES {
        require_tool(facts.runner().as_ref(), tool)?;
    }
    Ok(())
}

/// Flags for a provisioning run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    /// Plan installs without running them.
    pub dry_run: bool,
    /// Install without probing first.
    pub force: bool,
    /// Read unexpected probe errors as "not installed".
    pub lenient_probe: bool,
}

/// What happened to one piece of software.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    AlreadyInstalled,
    Installed {
        method: String,
        hook_warning: Option<String>,
    },
    WouldInstall {
        method: String,
        steps: Vec<String>,
    },
    Failed {
        reason: String,
    },
}

/// Outcome for one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareResult {
    pub id: String,
    pub name: String,
    pub outcome: Outcome,
}

/// Outcomes of a whole run, in the order software was processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub results: Vec<SoftwareResult>,
}

impl RunReport {
    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| f(&r.outcome)).count()
    }

    pub fn installed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Installed { .. }))
    }

    pub fn already_installed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyInstalled))
    }

    pub fn would_install(&self) -> usize {
        self.count(|o| matches!(o, Outcome::WouldInstall { .. }))
    }

    /// Names of software that failed.
    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed().is_empty()
    }

    pub fn outcome_of(&self, id: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.id == id)
            .map(|r| &r.outcome)
    }
}

/// Drives probing, resolution and installation over a selection.
pub struct Orchestrator<'a> {
    facts: &'a EnvironmentFacts,
    options: ProvisionOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(facts: &'a EnvironmentFacts, options: ProvisionOptions) -> Self {
        Self { facts, options }
    }

    /// Provision every descriptor in order.
    pub fn run(&self, software: &[&SoftwareDescriptor], ui: &mut dyn UserInterface) -> RunReport {
        let mut report = RunReport::default();
        for descriptor in software {
            let outcome = self.provision_one(descriptor, ui);
            report.results.push(SoftwareResult {
                id: descriptor.id(),
                name: descriptor.name.clone(),
                outcome,
            });
        }
        report
    }

    /// Provision one descriptor, turning any error into [`Outcome::Failed`].
    pub fn provision_one(
        &self,
        descriptor: &SoftwareDescriptor,
        ui: &mut dyn UserInterface,
    ) -> Outcome {
        let name = descriptor.name.as_str();
        let mut spinner = ui.start_spinner(&format!("{}...", name));

        let outcome = match self.try_provision(descriptor, ui) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("{}: {}", name, e);
                spinner.finish_error(&format!("{} failed: {}", name, e));
                if let DevstrapError::ProcessFailed { command, .. } = &e {
                    ui.show_error_block(command, &e.captured_output().unwrap_or_default());
                }
                return Outcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match &outcome {
            Outcome::AlreadyInstalled => {
                spinner.finish_skipped(&format!("{} is already installed", name));
            }
            Outcome::WouldInstall { method, steps } => {
                spinner.finish_skipped(&format!("{} would be installed via {}", name, method));
                for step in steps {
                    ui.message(&format!("    $ {}", step));
                }
            }
            Outcome::Installed {
                method,
                hook_warning,
            } => {
                spinner.finish_success(&format!("{} installed via {}", name, method));
                if let Some(warning) = hook_warning {
                    ui.warning(&format!("{}: post-install step failed: {}", name, warning));
                }
            }
            Outcome::Failed { reason } => {
                spinner.finish_error(&format!("{} failed: {}", name, reason));
            }
        }
        outcome
    }

    fn try_provision(
        &self,
        descriptor: &SoftwareDescriptor,
        ui: &mut dyn UserInterface,
    ) -> Result<Outcome> {
        if self.options.force {
            tracing::debug!("{}: forced, skipping probe", descriptor.name);
        } else {
            let prober = InstalledStateProber::new(self.facts, self.options.lenient_probe);
            if prober.is_installed(descriptor)? {
                return Ok(Outcome::AlreadyInstalled);
            }
        }

        let host = self.facts.snapshot();
        let method = resolve(descriptor, &host)?;

        if self.options.dry_run {
            return Ok(Outcome::WouldInstall {
                method: method.label().to_string(),
                steps: plan(method, &host).iter().map(|s| s.to_string()).collect(),
            });
        }

        tracing::info!("Installing {} via {}", descriptor.name, method.label());
        let stream = ui.output_mode().shows_command_output();
        let report = Executor::new(self.facts.runner().as_ref(), &host)
            .streaming(stream)
            .execute(descriptor, method)?;

        for notice in &report.notices {
            ui.message(&format!("  {}", notice));
        }

        Ok(Outcome::Installed {
            method: method.label().to_string(),
            hook_warning: report.hook_warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{HostFacts, Platform, SystemPackageManager};
    use crate::shell::{CommandOptions, CommandResult, MockRunner, ProcessRunner};
    use crate::software::{BrewPackage, HookStep, InstallMethod, InstallationCheck};
    use crate::ui::{MockUI, SpinnerStatus};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn zsh() -> SoftwareDescriptor {
        SoftwareDescriptor::new("Zsh", &[Platform::MacOs, Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["zsh".into()]))
            .with_method(InstallMethod::Brew(BrewPackage::formula("zsh").mac_only()))
            .with_method(InstallMethod::SystemPackages(vec!["zsh".into()]))
    }

    fn apt_facts(runner: Arc<dyn ProcessRunner>) -> EnvironmentFacts {
        EnvironmentFacts::fixed(
            runner,
            HostFacts::bare(Platform::Linux).with_system_package_manager(SystemPackageManager::Apt),
        )
    }

    /// Runner whose PATH gains a package once apt installs it.
    struct AptHost {
        inner: MockRunner,
        installed: Mutex<HashSet<String>>,
    }

    impl AptHost {
        fn new() -> Self {
            Self {
                inner: MockRunner::new(),
                installed: Mutex::new(HashSet::new()),
            }
        }
    }

    impl ProcessRunner for AptHost {
        fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
            let result = self.inner.run(argv, options)?;
            if let Some(pos) = argv.iter().position(|a| a == "-y") {
                if argv.iter().any(|a| a == "apt") {
                    let mut installed = self.installed.lock().unwrap();
                    installed.extend(argv[pos + 1..].iter().cloned());
                }
            }
            Ok(result)
        }

        fn command_exists(&self, program: &str) -> bool {
            self.installed.lock().unwrap().contains(program)
        }
    }

    #[test]
    fn installs_zsh_with_apt() {
        let runner = Arc::new(MockRunner::new());
        let facts = apt_facts(runner.clone());
        let mut ui = MockUI::new();

        let report = Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&zsh()], &mut ui);

        assert!(runner.was_run("sudo apt install -y zsh"));
        assert_eq!(
            report.outcome_of("zsh"),
            Some(&Outcome::Installed {
                method: "system packages".into(),
                hook_warning: None
            })
        );
        assert_eq!(
            ui.finished(),
            vec![(
                SpinnerStatus::Success,
                "Zsh installed via system packages".to_string()
            )]
        );
    }

    #[test]
    fn present_software_is_not_resolved() {
        let runner = Arc::new(MockRunner::new().with_commands(&["zsh", "apt"]));
        let facts =
            EnvironmentFacts::new(runner.clone(), Platform::Linux, "/home/dev".into(), None);
        let mut ui = MockUI::new();

        let report = Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&zsh()], &mut ui);

        assert_eq!(report.outcome_of("zsh"), Some(&Outcome::AlreadyInstalled));
        // No host facts were probed and nothing was installed.
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let host = Arc::new(AptHost::new());
        let facts = apt_facts(host.clone());
        let orchestrator = Orchestrator::new(&facts, ProvisionOptions::default());

        let first = orchestrator.run(&[&zsh()], &mut MockUI::new());
        assert_eq!(first.installed(), 1);
        let calls_after_first = host.inner.calls().len();

        let second = orchestrator.run(&[&zsh()], &mut MockUI::new());
        assert_eq!(second.already_installed(), 1);
        assert_eq!(host.inner.calls().len(), calls_after_first);
    }

    #[test]
    fn dry_run_plans_without_running() {
        let runner = Arc::new(MockRunner::new());
        let facts = apt_facts(runner.clone());
        let mut ui = MockUI::new();
        let options = ProvisionOptions {
            dry_run: true,
            ..Default::default()
        };

        let report = Orchestrator::new(&facts, options).run(&[&zsh()], &mut ui);

        assert_eq!(
            report.outcome_of("zsh"),
            Some(&Outcome::WouldInstall {
                method: "system packages".into(),
                steps: vec!["sudo apt install -y zsh".into()]
            })
        );
        assert!(runner.calls().is_empty());
        assert!(ui.has_message("$ sudo apt install -y zsh"));
    }

    #[test]
    fn force_skips_the_probe() {
        let runner = Arc::new(MockRunner::new().with_commands(&["zsh"]));
        let facts = apt_facts(runner.clone());
        let options = ProvisionOptions {
            force: true,
            ..Default::default()
        };

        let report = Orchestrator::new(&facts, options).run(&[&zsh()], &mut MockUI::new());

        assert_eq!(report.installed(), 1);
        assert!(runner.was_run("sudo apt install -y zsh"));
    }

    #[test]
    fn failure_does_not_stop_the_run() {
        let runner = Arc::new(MockRunner::new().fail_with(
            "sudo apt install -y zsh",
            100,
            "E: Unable to locate package zsh",
        ));
        let facts = apt_facts(runner.clone());
        let git = SoftwareDescriptor::new("Git", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["git".into()]))
            .with_method(InstallMethod::SystemPackages(vec!["git".into()]));
        let mut ui = MockUI::new();

        let report =
            Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&zsh(), &git], &mut ui);

        assert_eq!(report.failed(), vec!["Zsh"]);
        assert_eq!(report.installed(), 1);
        assert!(report.has_failures());
        assert_eq!(ui.error_blocks().len(), 1);
        assert!(ui.error_blocks()[0].1.contains("Unable to locate package"));
    }

    #[test]
    fn every_spinner_is_finished_once() {
        let runner = Arc::new(
            MockRunner::new()
                .with_commands(&["git"])
                .fail_on("sudo apt install -y zsh"),
        );
        let facts = apt_facts(runner);
        let git = SoftwareDescriptor::new("Git", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["git".into()]))
            .with_method(InstallMethod::SystemPackages(vec!["git".into()]));
        let vim = SoftwareDescriptor::new("Vim", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["vim".into()]))
            .with_method(InstallMethod::SystemPackages(vec!["vim".into()]));
        let mut ui = MockUI::new();

        Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&git, &zsh(), &vim], &mut ui);

        let finished = ui.finished();
        assert_eq!(ui.spinners().len(), 3);
        assert_eq!(
            finished.iter().map(|(status, _)| *status).collect::<Vec<_>>(),
            vec![
                SpinnerStatus::Skipped,
                SpinnerStatus::Error,
                SpinnerStatus::Success
            ]
        );
        assert_eq!(finished[0].1, "Git is already installed");
        assert!(finished[1].1.starts_with("Zsh failed: Command failed"));
        assert_eq!(finished[2].1, "Vim installed via system packages");
    }

    #[test]
    fn indeterminate_probe_fails_only_that_entry() {
        let runner = Arc::new(MockRunner::new());
        let facts = apt_facts(runner.clone());
        let nix = SoftwareDescriptor::new("Nix", &[Platform::Linux])
            .with_method(InstallMethod::LinuxManual("install-nix".into()));

        let report =
            Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&nix, &zsh()], &mut MockUI::new());

        assert!(matches!(
            report.outcome_of("nix"),
            Some(Outcome::Failed { reason }) if reason.contains("Cannot tell")
        ));
        assert_eq!(report.installed(), 1);
        assert!(!runner.was_run("sh -c install-nix"));
    }

    #[test]
    fn no_applicable_method_is_reported() {
        let runner = Arc::new(MockRunner::new());
        let facts = apt_facts(runner);
        let slack = SoftwareDescriptor::new("Slack", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["slack".into()]))
            .with_method(InstallMethod::Brew(BrewPackage::cask("slack")));

        let report =
            Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&slack], &mut MockUI::new());

        assert!(matches!(
            report.outcome_of("slack"),
            Some(Outcome::Failed { reason }) if reason.contains("No installation method")
        ));
    }

    #[test]
    fn hook_failure_is_a_warning() {
        let runner = Arc::new(MockRunner::new().fail_on("sh -c 'flatpak remote-add"));
        let facts = apt_facts(runner);
        let flatpak = SoftwareDescriptor::new("Flatpak", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["flatpak".into()]))
            .with_method(InstallMethod::SystemPackages(vec!["flatpak".into()]))
            .with_hook(HookStep::Shell(
                "flatpak remote-add --if-not-exists flathub https://flathub.org/repo/flathub.flatpakrepo".into(),
            ));
        let mut ui = MockUI::new();

        let report = Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&flatpak], &mut ui);

        assert!(matches!(
            report.outcome_of("flatpak"),
            Some(Outcome::Installed { hook_warning: Some(_), .. })
        ));
        assert!(!report.has_failures());
        assert!(ui.has_warning("post-install step failed"));
    }

    #[test]
    fn notices_reach_the_user() {
        let runner = Arc::new(MockRunner::new());
        let facts = apt_facts(runner);
        let omz = SoftwareDescriptor::new("Oh My Zsh", &[Platform::Linux])
            .with_check(InstallationCheck::Commands(vec!["omz".into()]))
            .with_method(InstallMethod::LinuxManual("install-omz".into()))
            .with_hook(HookStep::Notice("Update your ~/.zshrc".into()));
        let mut ui = MockUI::new();

        Orchestrator::new(&facts, ProvisionOptions::default()).run(&[&omz], &mut ui);

        assert!(ui.has_message("Update your ~/.zshrc"));
    }

    #[test]
    fn prerequisites_require_curl() {
        let without = apt_facts(Arc::new(MockRunner::new()));
        let with = apt_facts(Arc::new(MockRunner::new().with_commands(&["curl"])));

        assert!(matches!(
            check_prerequisites(&without),
            Err(DevstrapError::MissingPrerequisite { tool }) if tool == "curl"
        ));
        assert!(check_prerequisites(&with).is_ok());
    }
}
