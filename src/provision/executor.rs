//! Install method execution.
//!
//! A method is first turned into a list of [`PlannedStep`]s. Dry runs print
//! the plan; real runs execute it in order, stopping at the first failure.
//! Post-install hooks run afterwards and only ever produce a warning.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::environment::{expand_home, HostFacts};
use crate::error::{DevstrapError, Result};
use crate::shell::{format_command, CommandOptions, ProcessRunner};
use crate::software::{BrewKind, HookStep, InstallMethod, SoftwareDescriptor};

/// Exported to archive installer commands.
pub const EXTRACT_DIR_VAR: &str = "DEVSTRAP_EXTRACT_DIR";

/// One concrete action of an install.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedStep {
    /// Create a directory and its parents.
    EnsureDir(PathBuf),
    /// Run a command.
    Run {
        argv: Vec<String>,
        cwd: Option<PathBuf>,
        env: Vec<(String, String)>,
    },
}

impl PlannedStep {
    fn run(argv: Vec<String>) -> Self {
        PlannedStep::Run {
            argv,
            cwd: None,
            env: Vec::new(),
        }
    }

    fn run_in(argv: Vec<String>, cwd: &Path) -> Self {
        PlannedStep::Run {
            argv,
            cwd: Some(cwd.to_path_buf()),
            env: Vec::new(),
        }
    }
}

impl fmt::Display for PlannedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedStep::EnsureDir(dir) => write!(f, "mkdir -p {}", dir.display()),
            PlannedStep::Run { argv, cwd, .. } => match cwd {
                Some(dir) => write!(f, "(cd {}) {}", dir.display(), format_command(argv)),
                None => f.write_str(&format_command(argv)),
            },
        }
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn shell(text: &str) -> Vec<String> {
    argv(&["sh", "-c", text])
}

/// Prefix `sudo` unless already running as root.
fn privileged(facts: &HostFacts, mut command: Vec<String>) -> Vec<String> {
    if !facts.elevated {
        command.insert(0, "sudo".to_string());
    }
    command
}

/// Shell text with a `sudo ` prefix unless running as root.
fn privileged_text(facts: &HostFacts, text: &str) -> String {
    if facts.elevated {
        text.to_string()
    } else {
        format!("sudo {}", text)
    }
}

/// Final path segment of a URL, without query string or fragment.
pub fn url_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download")
        .to_string()
}

fn download(url: &str, facts: &HostFacts) -> (PathBuf, Vec<PlannedStep>) {
    let target = facts.download_dir.join(url_file_name(url));
    let steps = vec![
        PlannedStep::EnsureDir(facts.download_dir.clone()),
        PlannedStep::run(vec![
            "curl".to_string(),
            "-fsSL".to_string(),
            "-o".to_string(),
            target.to_string_lossy().into_owned(),
            url.to_string(),
        ]),
    ];
    (target, steps)
}

/// Steps that carry out `method` on the host described by `facts`.
pub fn plan(method: &InstallMethod, facts: &HostFacts) -> Vec<PlannedStep> {
    match method {
        InstallMethod::Brew(pkg) => {
            let mut steps: Vec<PlannedStep> = pkg
                .taps
                .iter()
                .map(|tap| PlannedStep::run(argv(&["brew", "tap", tap.as_str()])))
                .collect();
            steps.push(PlannedStep::run(match &pkg.kind {
                BrewKind::Formula(name) => argv(&["brew", "install", name.as_str()]),
                BrewKind::Cask(name) => argv(&["brew", "install", "--cask", name.as_str()]),
            }));
            steps
        }

        InstallMethod::MacManual(text)
        | InstallMethod::WslManual(text)
        | InstallMethod::LinuxManual(text) => vec![PlannedStep::run(shell(text))],

        InstallMethod::Snap(snap) => {
            let mut command = argv(&["snap", "install", snap.package.as_str()]);
            if snap.classic {
                command.push("--classic".to_string());
            }
            vec![PlannedStep::run(privileged(facts, command))]
        }

        InstallMethod::Flatpak(flatpak) => {
            let mut command = argv(&["flatpak", "install", "-y"]);
            command.extend(flatpak.remote.iter().cloned());
            command.push(flatpak.package.clone());
            vec![PlannedStep::run(privileged(facts, command))]
        }

        InstallMethod::DpkgThirdParty { url } => {
            let (file, mut steps) = download(url, facts);
            steps.push(PlannedStep::run(privileged(
                facts,
                vec![
                    "dpkg".to_string(),
                    "-i".to_string(),
                    file.to_string_lossy().into_owned(),
                ],
            )));
            steps
        }

        InstallMethod::EopkgThirdParty {
            spec_url,
            package_file_pattern,
        } => {
            let dir = facts.download_dir.as_path();
            vec![
                PlannedStep::EnsureDir(dir.to_path_buf()),
                PlannedStep::run_in(
                    privileged(facts, argv(&["eopkg", "bi", "--ignore-safety", spec_url.as_str()])),
                    dir,
                ),
                PlannedStep::run_in(
                    shell(&privileged_text(
                        facts,
                        &format!("eopkg it {}", package_file_pattern),
                    )),
                    dir,
                ),
                PlannedStep::run_in(
                    shell(&privileged_text(
                        facts,
                        &format!("rm -f {}", package_file_pattern),
                    )),
                    dir,
                ),
            ]
        }

        InstallMethod::SystemPackages(pkgs) => match facts.system_package_manager {
            Some(pm) => {
                let mut command = argv(&[pm.command(), "install", "-y"]);
                command.extend(pkgs.iter().cloned());
                vec![PlannedStep::run(privileged(facts, command))]
            }
            None => Vec::new(),
        },

        InstallMethod::Archive { url, installer } => {
            let (file, mut steps) = download(url, facts);
            let extract = extract_dir(&file);
            steps.push(PlannedStep::EnsureDir(extract.clone()));
            steps.push(PlannedStep::run(vec![
                "tar".to_string(),
                "zxf".to_string(),
                file.to_string_lossy().into_owned(),
                format!("--directory={}", extract.display()),
            ]));
            let extract_var = extract.to_string_lossy().into_owned();
            steps.extend(installer.iter().map(|command| PlannedStep::Run {
                argv: shell(command),
                cwd: Some(extract.clone()),
                env: vec![(EXTRACT_DIR_VAR.to_string(), extract_var.clone())],
            }));
            steps
        }
    }
}

/// What a successful install produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstallReport {
    /// Commands executed for the install itself.
    pub commands_run: usize,
    /// Notices from the post-install hook.
    pub notices: Vec<String>,
    /// Why the post-install hook stopped early, if it did.
    pub hook_warning: Option<String>,
}

/// Runs install plans and post-install hooks.
pub struct Executor<'a> {
    runner: &'a dyn ProcessRunner,
    facts: &'a HostFacts,
    stream_output: bool,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, facts: &'a HostFacts) -> Self {
        Self {
            runner,
            facts,
            stream_output: false,
        }
    }

    /// Let commands write to the terminal instead of capturing output.
    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream_output = stream;
        self
    }

    /// Install `descriptor` with `method`, then run its hook.
    ///
    /// # Errors
    ///
    /// The first failing step of the install. Hook failures are reported
    /// in [`InstallReport::hook_warning`] instead.
    pub fn execute(
        &self,
        descriptor: &SoftwareDescriptor,
        method: &InstallMethod,
    ) -> Result<InstallReport> {
        let steps = plan(method, self.facts);
        if steps.is_empty() {
            return Err(DevstrapError::NoApplicableMethod {
                software: descriptor.name.clone(),
                platform: self.facts.platform.to_string(),
            });
        }

        let mut report = InstallReport::default();
        for step in &steps {
            if self.run_step(step)? {
                report.commands_run += 1;
            }
        }

        if let Err(e) = self.run_hooks(descriptor, &mut report.notices) {
            tracing::warn!("{}: post-install hook failed: {}", descriptor.name, e);
            report.hook_warning = Some(e.to_string());
        }

        Ok(report)
    }

    /// Returns whether a command was spawned.
    fn run_step(&self, step: &PlannedStep) -> Result<bool> {
        tracing::debug!("step: {}", step);
        match step {
            PlannedStep::EnsureDir(dir) => {
                fs::create_dir_all(dir)?;
                Ok(false)
            }
            PlannedStep::Run { argv, cwd, env } => {
                let mut options = CommandOptions {
                    capture: !self.stream_output,
                    ..Default::default()
                };
                if let Some(dir) = cwd {
                    options = options.in_dir(dir);
                }
                for (key, value) in env {
                    options = options.with_env(key, value.clone());
                }
                self.runner.run(argv, &options)?;
                Ok(true)
            }
        }
    }

    /// Run the post-install hook, collecting notices as they come.
    fn run_hooks(&self, descriptor: &SoftwareDescriptor, notices: &mut Vec<String>) -> Result<()> {
        for step in &descriptor.post_install {
            match step {
                HookStep::Shell(text) => {
                    self.run_step(&PlannedStep::run(shell(text)))?;
                }
                HookStep::Symlink { source, link } => {
                    let source = expand_home(source, &self.facts.home_dir);
                    let link = expand_home(link, &self.facts.home_dir);
                    create_symlink(&source, &link)?;
                }
                HookStep::Notice(text) => notices.push(text.clone()),
                HookStep::DesktopPackages(pkgs) => {
                    match (self.facts.desktop_shell, self.facts.system_package_manager) {
                        (true, Some(pm)) => {
                            let mut command = argv(&[pm.command(), "install", "-y"]);
                            command.extend(pkgs.iter().cloned());
                            self.run_step(&PlannedStep::run(privileged(self.facts, command)))?;
                        }
                        _ => tracing::debug!(
                            "{}: no desktop shell, skipping {}",
                            descriptor.name,
                            pkgs.join(" ")
                        ),
                    }
                }
            }
        }
        Ok(())
    }
}

/// Directory an archive unpacks into: the file path minus its last
/// extension, or `<file>.d` when there is no extension to strip.
pub fn extract_dir(file: &Path) -> PathBuf {
    if file.extension().is_some() {
        file.with_extension("")
    } else {
        let mut dir = file.as_os_str().to_owned();
        dir.push(".d");
        PathBuf::from(dir)
    }
}

/// Link `link` to `source` unless something already sits at `link`.
#[cfg(unix)]
fn create_symlink(source: &Path, link: &Path) -> Result<()> {
    if link.symlink_metadata().is_ok() {
        tracing::debug!("{} already exists, leaving it", link.display());
        return Ok(());
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    std::os::unix::fs::symlink(source, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_symlink(_source: &Path, link: &Path) -> Result<()> {
    Err(anyhow::anyhow!("cannot create symlink {} on this platform", link.display()).into())
}
