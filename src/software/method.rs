//! Typed installation methods.
//!
//! A descriptor lists its methods in any order; the resolver decides which
//! one applies from each variant's rank, not from list position.

use serde::{Deserialize, Serialize};

/// One way of installing a piece of software.
///
/// Serialized externally tagged in snake_case:
///
/// ```yaml
/// methods:
///   - brew: { cask: slack }
///   - snap: { package: slack, classic: true }
///   - system_packages: [zsh]
///   - linux_manual: sh -c "$(curl -fsSL https://example.com/install.sh)"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    /// Homebrew formula or cask.
    Brew(BrewPackage),

    /// Shell text run on macOS.
    MacManual(String),

    /// Snap package.
    Snap(SnapPackage),

    /// Flatpak application from a remote.
    Flatpak(FlatpakPackage),

    /// Vendor `.deb` downloaded and installed with dpkg.
    DpkgThirdParty { url: String },

    /// Solus third-party package: build from its pspec, install, then clean up.
    EopkgThirdParty {
        spec_url: String,
        package_file_pattern: String,
    },

    /// Package names for the distribution package manager.
    SystemPackages(Vec<String>),

    /// Tarball downloaded, extracted, then handed to installer commands
    /// run inside the extraction directory.
    Archive { url: String, installer: Vec<String> },

    /// Shell text run under WSL.
    WslManual(String),

    /// Shell text run on plain Linux.
    LinuxManual(String),
}

impl InstallMethod {
    /// Short label for logs and dry-run output.
    pub fn label(&self) -> &'static str {
        match self {
            InstallMethod::Brew(pkg) if pkg.is_cask() => "brew cask",
            InstallMethod::Brew(_) => "brew",
            InstallMethod::MacManual(_) => "manual (macOS)",
            InstallMethod::Snap(_) => "snap",
            InstallMethod::Flatpak(_) => "flatpak",
            InstallMethod::DpkgThirdParty { .. } => "dpkg",
            InstallMethod::EopkgThirdParty { .. } => "eopkg third-party",
            InstallMethod::SystemPackages(_) => "system packages",
            InstallMethod::Archive { .. } => "archive",
            InstallMethod::WslManual(_) => "manual (WSL)",
            InstallMethod::LinuxManual(_) => "manual (Linux)",
        }
    }
}

/// Formula or cask. A cask carries an application bundle id and only
/// exists on macOS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewKind {
    Formula(String),
    Cask(String),
}

/// A Homebrew package.
///
/// ```yaml
/// brew: { formula: zsh, mac_only: true }
/// brew: { cask: google-chrome }
/// brew: { formula: mongodb-community, taps: [mongodb/brew] }
/// ```
///
/// Exactly one of `formula` and `cask` must be given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BrewFields", into = "BrewFields")]
pub struct BrewPackage {
    pub kind: BrewKind,

    /// Taps added before installing.
    pub taps: Vec<String>,

    /// Skip this formula on Linux.
    pub mac_only: bool,
}

/// On-disk shape of [`BrewPackage`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct BrewFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cask: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    taps: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    mac_only: bool,
}

impl TryFrom<BrewFields> for BrewPackage {
    type Error = String;

    fn try_from(fields: BrewFields) -> Result<Self, Self::Error> {
        let kind = match (fields.formula, fields.cask) {
            (Some(formula), None) => BrewKind::Formula(formula),
            (None, Some(cask)) => BrewKind::Cask(cask),
            (Some(formula), Some(cask)) => {
                return Err(format!(
                    "brew package sets both formula '{}' and cask '{}'",
                    formula, cask
                ))
            }
            (None, None) => return Err("brew package needs a formula or a cask".to_string()),
        };
        Ok(Self {
            kind,
            taps: fields.taps,
            mac_only: fields.mac_only,
        })
    }
}

impl From<BrewPackage> for BrewFields {
    fn from(pkg: BrewPackage) -> Self {
        let (formula, cask) = match pkg.kind {
            BrewKind::Formula(name) => (Some(name), None),
            BrewKind::Cask(name) => (None, Some(name)),
        };
        Self {
            formula,
            cask,
            taps: pkg.taps,
            mac_only: pkg.mac_only,
        }
    }
}

impl BrewPackage {
    pub fn formula(name: &str) -> Self {
        Self {
            kind: BrewKind::Formula(name.to_string()),
            taps: Vec::new(),
            mac_only: false,
        }
    }

    pub fn cask(name: &str) -> Self {
        Self {
            kind: BrewKind::Cask(name.to_string()),
            taps: Vec::new(),
            mac_only: false,
        }
    }

    pub fn mac_only(mut self) -> Self {
        self.mac_only = true;
        self
    }

    pub fn is_cask(&self) -> bool {
        matches!(self.kind, BrewKind::Cask(_))
    }

    /// Casks are always macOS-only.
    pub fn is_mac_only(&self) -> bool {
        self.mac_only || self.is_cask()
    }

    /// Formula or cask name.
    pub fn name(&self) -> &str {
        match &self.kind {
            BrewKind::Formula(name) | BrewKind::Cask(name) => name,
        }
    }
}

/// A snap package; `classic` maps to `--classic` confinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapPackage {
    pub package: String,
    #[serde(default)]
    pub classic: bool,
}

/// A flatpak application; only usable when a remote is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatpakPackage {
    #[serde(default)]
    pub remote: Option<String>,
    pub package: String,
}
