//! Configuration loading and parsing for devstrap.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use devstrap::config::load_config_file;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//! fs::write(&path, "settings:\n  lenient_probe: true\n").unwrap();
//!
//! let config = load_config_file(&path).unwrap();
//! assert!(config.settings.lenient_probe);
//! ```
//!
//! # Configuration File Location
//!
//! `--config <path>` if given, otherwise `~/.config/devstrap/config.yml`
//! when it exists. Without either, built-in defaults apply.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, resolve_catalog,
};
pub use schema::{DevstrapConfig, OutputMode, Settings};
