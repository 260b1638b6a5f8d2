//! Platform families and package manager kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DevstrapError, Result};

/// Operating system family a catalog entry can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "darwin")]
    MacOs,
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "windows")]
    Windows,
}

impl Platform {
    /// Platform of the running host.
    ///
    /// # Errors
    ///
    /// [`DevstrapError::UnsupportedPlatform`] for anything other than
    /// macOS or Linux. Windows is a valid catalog tag but not a host
    /// devstrap can provision.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a provisionable platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(DevstrapError::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    /// Catalog name of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distribution package manager used for plain package lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemPackageManager {
    Apt,
    Eopkg,
}

impl SystemPackageManager {
    /// Detection order; the first one present wins.
    pub const PRIORITY: [SystemPackageManager; 2] =
        [SystemPackageManager::Apt, SystemPackageManager::Eopkg];

    /// Executable name.
    pub fn command(&self) -> &'static str {
        match self {
            SystemPackageManager::Apt => "apt",
            SystemPackageManager::Eopkg => "eopkg",
        }
    }
}

/// Tool that installs vendor-supplied binary packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThirdPartyPackageManager {
    Dpkg,
    Eopkg,
}

impl ThirdPartyPackageManager {
    /// Detection order; the first one present wins.
    pub const PRIORITY: [ThirdPartyPackageManager; 2] = [
        ThirdPartyPackageManager::Dpkg,
        ThirdPartyPackageManager::Eopkg,
    ];

    /// Executable name.
    pub fn command(&self) -> &'static str {
        match self {
            ThirdPartyPackageManager::Dpkg => "dpkg",
            ThirdPartyPackageManager::Eopkg => "eopkg",
        }
    }
}
