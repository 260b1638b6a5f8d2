//! Software descriptors.
//!
//! A [`SoftwareDescriptor`] is static data: what the software is called,
//! which platforms it targets, how to detect it and which methods can
//! install it. Descriptors are loaded once and never mutated.

pub mod check;
pub mod hook;
pub mod method;

pub use check::InstallationCheck;
pub use hook::HookStep;
pub use method::{BrewKind, BrewPackage, FlatpakPackage, InstallMethod, SnapPackage};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::environment::Platform;

static ID_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("ID_SEPARATORS must compile"));

/// Normalize a display name into a machine id.
///
/// Lowercases, collapses each run of non-alphanumerics into one `-`, and
/// trims separators from both ends.
///
/// ```
/// use devstrap::software::idify;
///
/// assert_eq!(idify("Visual Studio Code"), "visual-studio-code");
/// assert_eq!(idify("Oh My Zsh!"), "oh-my-zsh");
/// ```
pub fn idify(name: &str) -> String {
    ID_SEPARATORS
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Whether software is a terminal tool or a desktop application.
///
/// Command-line software is always installed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Cli,
    Ui,
}

/// A piece of software devstrap can install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareDescriptor {
    /// Display name; the id is derived from it.
    pub name: String,

    #[serde(default)]
    pub category: Category,

    /// Platforms this entry is valid on.
    pub platforms: Vec<Platform>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub check: Option<InstallationCheck>,

    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub methods: Vec<InstallMethod>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "serde_yaml::with::singleton_map_recursive"
    )]
    pub post_install: Vec<HookStep>,

    /// Try Homebrew first on every platform, for tools that must stay
    /// writable without root.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prefer_isolated_install: bool,
}

impl SoftwareDescriptor {
    /// A descriptor with a name and platforms and nothing else.
    pub fn new(name: &str, platforms: &[Platform]) -> Self {
        Self {
            name: name.to_string(),
            category: Category::Cli,
            platforms: platforms.to_vec(),
            check: None,
            methods: Vec::new(),
            post_install: Vec::new(),
            prefer_isolated_install: false,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_check(mut self, check: InstallationCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn with_method(mut self, method: InstallMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_hook(mut self, step: HookStep) -> Self {
        self.post_install.push(step);
        self
    }

    pub fn prefer_isolated(mut self) -> Self {
        self.prefer_isolated_install = true;
        self
    }

    /// Normalized machine id.
    pub fn id(&self) -> String {
        idify(&self.name)
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

/// Parse YAML where enums are written as single-key maps, the shape used
/// by catalog files.
#[cfg(test)]
pub(crate) fn parse_yaml<T: serde::de::DeserializeOwned>(yaml: &str) -> serde_yaml::Result<T> {
    let de = serde_yaml::Deserializer::from_str(yaml);
    serde_yaml::with::singleton_map_recursive::deserialize(de)
}
