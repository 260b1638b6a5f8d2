//! Configuration schema definitions for devstrap.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::software::SoftwareDescriptor;

/// Root configuration structure for `config.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevstrapConfig {
    /// Global settings
    pub settings: Settings,

    /// Replacement catalog. When present the built-in catalog is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<Vec<SoftwareDescriptor>>,
}

/// Global settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Treat unexpected probe errors as "not installed" instead of failing
    /// the probe.
    #[serde(skip_serializing_if = "is_false")]
    pub lenient_probe: bool,

    /// Where downloads and extracted archives go. `~/` is accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Output mode used when no CLI flag overrides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_output: Option<OutputMode>,
}

/// Output verbosity in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    Normal,
    Quiet,
}

fn is_false(b: &bool) -> bool {
    !*b
}
