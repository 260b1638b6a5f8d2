//! Install method resolution.
//!
//! Every method a descriptor lists gets a rank for the host, or no rank
//! when it cannot run there. The lowest rank wins; equal ranks fall back
//! to list order. Resolution is a pure function of the descriptor and a
//! [`HostFacts`] snapshot.

use crate::environment::{HostFacts, Platform, ThirdPartyPackageManager};
use crate::error::{DevstrapError, Result};
use crate::software::{InstallMethod, SoftwareDescriptor};

/// Rank of `method` on the host described by `facts`; `None` if the
/// method is not applicable there.
///
/// macOS: brew, then manual shell text.
///
/// Linux: brew (formulae not tied to macOS), snap, flatpak with a remote,
/// the matching third-party package, system packages, archive, WSL manual
/// under WSL, plain Linux manual.
pub fn rank(method: &InstallMethod, facts: &HostFacts) -> Option<u8> {
    match facts.platform {
        Platform::MacOs => match method {
            InstallMethod::Brew(_) => Some(1),
            InstallMethod::MacManual(_) => Some(2),
            _ => None,
        },
        Platform::Linux => match method {
            InstallMethod::Brew(pkg) if !pkg.is_mac_only() => Some(1),
            InstallMethod::Snap(_) => Some(2),
            InstallMethod::Flatpak(pkg) if pkg.remote.is_some() => Some(3),
            InstallMethod::DpkgThirdParty { .. }
                if facts.third_party_manager == Some(ThirdPartyPackageManager::Dpkg) =>
            {
                Some(4)
            }
            InstallMethod::EopkgThirdParty { .. }
                if facts.third_party_manager == Some(ThirdPartyPackageManager::Eopkg) =>
            {
                Some(4)
            }
            InstallMethod::SystemPackages(pkgs)
                if facts.system_package_manager.is_some() && !pkgs.is_empty() =>
            {
                Some(5)
            }
            InstallMethod::Archive { .. } => Some(6),
            InstallMethod::WslManual(_) if facts.wsl => Some(7),
            InstallMethod::LinuxManual(_) => Some(8),
            _ => None,
        },
        Platform::Windows => None,
    }
}

/// Pick the install method for `descriptor` on this host.
///
/// # Errors
///
/// [`DevstrapError::NoApplicableMethod`] if no listed method applies.
pub fn resolve<'a>(
    descriptor: &'a SoftwareDescriptor,
    facts: &HostFacts,
) -> Result<&'a InstallMethod> {
    descriptor
        .methods
        .iter()
        .enumerate()
        .filter_map(|(index, method)| {
            let mut rank = rank(method, facts)?;
            if descriptor.prefer_isolated_install && matches!(method, InstallMethod::Brew(_)) {
                rank = 0;
            }
            Some(((rank, index), method))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, method)| {
            tracing::debug!("{}: resolved to {}", descriptor.name, method.label());
            method
        })
        .ok_or_else(|| DevstrapError::NoApplicableMethod {
            software: descriptor.name.clone(),
            platform: facts.platform.to_string(),
        })
}
