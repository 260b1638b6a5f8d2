//! Configuration file discovery and loading.

use crate::catalog::Catalog;
use crate::config::schema::DevstrapConfig;
use crate::error::{DevstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location: `~/.config/devstrap/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("devstrap").join("config.yml"))
}

/// Load a single config file and parse it into [`DevstrapConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<DevstrapConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DevstrapError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`DevstrapConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DevstrapConfig> {
    if content.trim().is_empty() {
        return Ok(DevstrapConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| DevstrapError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit `config_override` must exist. Without one, the default
/// location is read if present, otherwise defaults are used.
pub fn load_config(config_override: Option<&Path>) -> Result<(DevstrapConfig, Option<PathBuf>)> {
    if let Some(path) = config_override {
        tracing::debug!("Loading config from {}", path.display());
        return Ok((load_config_file(path)?, Some(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!("Loading config from {}", path.display());
            let config = load_config_file(&path)?;
            Ok((config, Some(path)))
        }
        _ => Ok((DevstrapConfig::default(), None)),
    }
}

/// The catalog to provision from: the config's `software:` list if it has
/// one, else the built-in catalog.
pub fn resolve_catalog(config: &DevstrapConfig, source: Option<&Path>) -> Result<Catalog> {
    match &config.software {
        Some(entries) => {
            let source = source.unwrap_or_else(|| Path::new("config.yml"));
            tracing::debug!(
                "Using {} software entries from {}",
                entries.len(),
                source.display()
            );
            Catalog::from_entries(entries.clone(), source)
        }
        None => Catalog::builtin(),
    }
}
