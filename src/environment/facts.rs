//! Lazily computed host facts.
//!
//! [`EnvironmentFacts`] owns a [`ProcessRunner`] and computes each fact the
//! first time it is asked for, caching the answer in a `OnceLock` for the
//! rest of the run. Concurrent first calls block on the same initializer
//! rather than probing twice.
//!
//! The resolver and planner never see `EnvironmentFacts` directly; they
//! take a [`HostFacts`] snapshot, which tests build by hand.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::error::{DevstrapError, Result};
use crate::shell::{is_elevated, ProcessRunner};

use super::platform::{Platform, SystemPackageManager, ThirdPartyPackageManager};

const OSRELEASE_PATH: &str = "/proc/sys/kernel/osrelease";

/// Plain snapshot of every host fact.
#[derive(Debug, Clone, PartialEq)]
pub struct HostFacts {
    pub platform: Platform,
    pub home_dir: PathBuf,
    pub download_dir: PathBuf,
    pub desktop_shell: bool,
    pub wsl: bool,
    pub system_package_manager: Option<SystemPackageManager>,
    pub third_party_manager: Option<ThirdPartyPackageManager>,
    pub elevated: bool,
}

impl HostFacts {
    /// A bare host of the given platform: home at `/home/dev`, no package
    /// managers, no desktop, not WSL, not root.
    pub fn bare(platform: Platform) -> Self {
        let home_dir = PathBuf::from("/home/dev");
        Self {
            platform,
            download_dir: home_dir.join("Downloads"),
            home_dir,
            desktop_shell: false,
            wsl: false,
            system_package_manager: None,
            third_party_manager: None,
            elevated: false,
        }
    }

    pub fn with_system_package_manager(mut self, pm: SystemPackageManager) -> Self {
        self.system_package_manager = Some(pm);
        self
    }

    pub fn with_third_party_manager(mut self, pm: ThirdPartyPackageManager) -> Self {
        self.third_party_manager = Some(pm);
        self
    }

    pub fn with_wsl(mut self, wsl: bool) -> Self {
        self.wsl = wsl;
        self
    }

    pub fn with_desktop_shell(mut self, desktop: bool) -> Self {
        self.desktop_shell = desktop;
        self
    }

    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    pub fn with_home(mut self, home: &Path) -> Self {
        self.home_dir = home.to_path_buf();
        self.download_dir = home.join("Downloads");
        self
    }
}

/// Host facts computed on demand and cached for the process lifetime.
pub struct EnvironmentFacts {
    runner: Arc<dyn ProcessRunner>,
    platform: Platform,
    home_dir: PathBuf,
    download_dir: PathBuf,
    desktop_shell: OnceLock<bool>,
    wsl: OnceLock<bool>,
    system_package_manager: OnceLock<Option<SystemPackageManager>>,
    third_party_manager: OnceLock<Option<ThirdPartyPackageManager>>,
    elevated: OnceLock<bool>,
}

impl std::fmt::Debug for EnvironmentFacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentFacts")
            .field("platform", &self.platform)
            .field("home_dir", &self.home_dir)
            .field("download_dir", &self.download_dir)
            .finish_non_exhaustive()
    }
}

impl EnvironmentFacts {
    /// Facts for the running host.
    ///
    /// # Errors
    ///
    /// [`DevstrapError::UnsupportedPlatform`] if the host is not macOS or
    /// Linux, or an error if the home directory cannot be determined.
    pub fn detect(runner: Arc<dyn ProcessRunner>, download_dir: Option<PathBuf>) -> Result<Self> {
        let platform = Platform::current()?;
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine the home directory"))?;
        Ok(Self::new(runner, platform, home_dir, download_dir))
    }

    /// Facts for an explicit platform and home directory. Everything else
    /// is still probed lazily through `runner`.
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        platform: Platform,
        home_dir: PathBuf,
        download_dir: Option<PathBuf>,
    ) -> Self {
        let download_dir = download_dir
            .map(|d| expand_home(&d.to_string_lossy(), &home_dir))
            .unwrap_or_else(|| home_dir.join("Downloads"));
        Self {
            runner,
            platform,
            home_dir,
            download_dir,
            desktop_shell: OnceLock::new(),
            wsl: OnceLock::new(),
            system_package_manager: OnceLock::new(),
            third_party_manager: OnceLock::new(),
            elevated: OnceLock::new(),
        }
    }

    /// Facts fixed up front; nothing is probed.
    pub fn fixed(runner: Arc<dyn ProcessRunner>, host: HostFacts) -> Self {
        let facts = Self::new(
            runner,
            host.platform,
            host.home_dir,
            Some(host.download_dir),
        );
        let _ = facts.desktop_shell.set(host.desktop_shell);
        let _ = facts.wsl.set(host.wsl);
        let _ = facts.system_package_manager.set(host.system_package_manager);
        let _ = facts.third_party_manager.set(host.third_party_manager);
        let _ = facts.elevated.set(host.elevated);
        facts
    }

    /// The runner facts are probed with.
    pub fn runner(&self) -> &Arc<dyn ProcessRunner> {
        &self.runner
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Whether a GNOME desktop shell is running.
    pub fn desktop_shell(&self) -> bool {
        *self.desktop_shell.get_or_init(|| {
            if self.platform != Platform::Linux {
                return false;
            }
            let running = self.runner.run_captured(&["pgrep", "gnome-shell"]).is_ok();
            tracing::debug!("Desktop shell running: {}", running);
            running
        })
    }

    /// Whether this is Linux nested inside Windows (WSL).
    pub fn wsl(&self) -> bool {
        *self.wsl.get_or_init(|| {
            if self.platform != Platform::Linux {
                return false;
            }
            let osrelease = std::fs::read_to_string(OSRELEASE_PATH).ok();
            let wsl = detect_wsl(|key| std::env::var(key), osrelease.as_deref());
            tracing::debug!("Running under WSL: {}", wsl);
            wsl
        })
    }

    /// The distribution package manager, if any.
    pub fn system_package_manager(&self) -> Option<SystemPackageManager> {
        *self.system_package_manager.get_or_init(|| {
            if self.platform != Platform::Linux {
                return None;
            }
            let found = SystemPackageManager::PRIORITY
                .into_iter()
                .find(|pm| self.runner.command_exists(pm.command()));
            tracing::debug!("System package manager: {:?}", found);
            found
        })
    }

    /// The third-party binary package manager, if any.
    pub fn third_party_manager(&self) -> Option<ThirdPartyPackageManager> {
        *self.third_party_manager.get_or_init(|| {
            if self.platform != Platform::Linux {
                return None;
            }
            let found = ThirdPartyPackageManager::PRIORITY
                .into_iter()
                .find(|pm| self.runner.command_exists(pm.command()));
            tracing::debug!("Third-party package manager: {:?}", found);
            found
        })
    }

    /// Whether devstrap runs as root.
    pub fn elevated(&self) -> bool {
        *self.elevated.get_or_init(is_elevated)
    }

    /// Force every fact and copy them into a [`HostFacts`].
    pub fn snapshot(&self) -> HostFacts {
        HostFacts {
            platform: self.platform,
            home_dir: self.home_dir.clone(),
            download_dir: self.download_dir.clone(),
            desktop_shell: self.desktop_shell(),
            wsl: self.wsl(),
            system_package_manager: self.system_package_manager(),
            third_party_manager: self.third_party_manager(),
            elevated: self.elevated(),
        }
    }
}

/// Decide WSL from environment markers and the kernel release string.
pub fn detect_wsl<F>(env_fn: F, osrelease: Option<&str>) -> bool
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let marker_set = ["WSL_DISTRO_NAME", "IS_WSL"]
        .iter()
        .any(|key| env_fn(key).map(|v| !v.is_empty()).unwrap_or(false));

    marker_set
        || osrelease
            .map(|release| release.to_lowercase().contains("microsoft"))
            .unwrap_or(false)
}

/// Expand a leading `~` or `~/` against `home`.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Require a tool on PATH before any work starts.
pub fn require_tool(runner: &dyn ProcessRunner, tool: &str) -> Result<()> {
    if runner.command_exists(tool) {
        Ok(())
    } else {
        Err(DevstrapError::MissingPrerequisite {
            tool: tool.to_string(),
        })
    }
}
