//! Installed-state prober.
//!
//! Builds every check a descriptor supports on this host, runs them
//! concurrently and OR-combines the answers: software counts as installed
//! if any one way of having installed it shows up.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use crate::environment::{EnvironmentFacts, Platform};
use crate::error::{DevstrapError, Result};
use crate::shell::{CommandOptions, ProcessRunner};
use crate::software::{BrewKind, InstallMethod, SoftwareDescriptor};

/// A single independent installation check.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Command present on PATH.
    Command(String),
    /// Path exists (symlinks count even if dangling).
    File(PathBuf),
    /// Package manager query that exits zero when the package is installed.
    Query(Vec<String>),
}

impl Check {
    fn query(argv: &[&str]) -> Self {
        Check::Query(argv.iter().map(|s| s.to_string()).collect())
    }

    /// Run the check. `Ok(false)` covers "not there" answers, including a
    /// query tool exiting non-zero or being absent.
    pub fn evaluate(&self, runner: &dyn ProcessRunner) -> Result<bool> {
        match self {
            Check::Command(name) => Ok(runner.command_exists(name)),
            Check::File(path) => match path.symlink_metadata() {
                Ok(_) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(DevstrapError::Io(e)),
            },
            Check::Query(argv) => match runner.run(argv, &CommandOptions::captured()) {
                Ok(_) => Ok(true),
                Err(e) if e.is_negative_probe() => Ok(false),
                Err(e) => Err(e),
            },
        }
    }
}

/// Decides whether software is already installed.
pub struct InstalledStateProber<'a> {
    facts: &'a EnvironmentFacts,
    lenient: bool,
}

impl<'a> InstalledStateProber<'a> {
    /// Create a prober. With `lenient` set, unexpected check errors are
    /// read as "not installed" instead of failing the probe.
    pub fn new(facts: &'a EnvironmentFacts, lenient: bool) -> Self {
        Self { facts, lenient }
    }

    /// All checks that apply to `descriptor` on this host.
    pub fn checks_for(&self, descriptor: &SoftwareDescriptor) -> Vec<Check> {
        let mut checks = Vec::new();

        if let Some(check) = &descriptor.check {
            checks.extend(check.commands().iter().cloned().map(Check::Command));
            checks.extend(
                check
                    .expanded_files(self.facts.home_dir())
                    .into_iter()
                    .map(Check::File),
            );
        }

        // A query whose tool is not installed ends in CommandNotFound,
        // which counts as a negative for that check.
        let platform = self.facts.platform();
        for method in &descriptor.methods {
            match method {
                InstallMethod::Brew(pkg) => {
                    match (&pkg.kind, platform) {
                        (BrewKind::Cask(cask), Platform::MacOs) => {
                            checks.push(Check::query(&["brew", "list", "--cask", cask.as_str()]));
                        }
                        (BrewKind::Formula(name), Platform::MacOs) => {
                            checks.push(Check::query(&["brew", "list", "--formula", name.as_str()]));
                        }
                        (BrewKind::Formula(name), Platform::Linux) if !pkg.mac_only => {
                            checks.push(Check::query(&["brew", "list", "--formula", name.as_str()]));
                        }
                        _ => {}
                    }
                }
                InstallMethod::Snap(snap) if platform == Platform::Linux => {
                    checks.push(Check::query(&["snap", "list", snap.package.as_str()]));
                }
                InstallMethod::Flatpak(flatpak) if platform == Platform::Linux => {
                    checks.push(Check::query(&["flatpak", "info", flatpak.package.as_str()]));
                }
                _ => {}
            }
        }

        checks
    }

    /// Whether `descriptor` is already installed.
    ///
    /// # Errors
    ///
    /// - [`DevstrapError::ProbeIndeterminate`] if no check applies
    /// - the first unexpected error, if every check failed unexpectedly
    ///   and the prober is not lenient
    pub fn is_installed(&self, descriptor: &SoftwareDescriptor) -> Result<bool> {
        let checks = self.checks_for(descriptor);
        if checks.is_empty() {
            return Err(DevstrapError::ProbeIndeterminate {
                software: descriptor.name.clone(),
            });
        }

        let total = checks.len();
        let (tx, rx) = mpsc::channel();
        for check in checks {
            let tx = tx.clone();
            let runner: Arc<dyn ProcessRunner> = Arc::clone(self.facts.runner());
            thread::spawn(move || {
                let outcome = check.evaluate(runner.as_ref());
                let _ = tx.send((check, outcome));
            });
        }
        drop(tx);

        let mut errors = Vec::new();
        let mut answered = 0;
        for (check, outcome) in rx {
            answered += 1;
            match outcome {
                Ok(true) => {
                    tracing::debug!("{}: installed per {:?}", descriptor.name, check);
                    return Ok(true);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("{}: check {:?} failed: {}", descriptor.name, check, e);
                    errors.push(e);
                }
            }
        }

        // A check thread that died without reporting counts as unexpected.
        if answered < total {
            errors.push(
                anyhow::anyhow!("{} installation check(s) did not report", total - answered)
                    .into(),
            );
        }

        if !errors.is_empty() && errors.len() == total && !self.lenient {
            return Err(errors.remove(0));
        }

        tracing::debug!("{}: not installed", descriptor.name);
        Ok(false)
    }
}
