//! The software catalog.
//!
//! The built-in catalog is YAML embedded at compile time from `catalog/`.
//! A user configuration may replace it wholesale with its own `software:`
//! list. Either way entries are validated once on load and then only read.

use include_dir::{include_dir, Dir};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::environment::Platform;
use crate::error::{DevstrapError, Result};
use crate::software::{idify, SoftwareDescriptor};

/// Embedded catalog directory.
static CATALOG_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/catalog");

/// Built-in catalog files, in install order.
const CATALOG_FILES: &[&str] = &["cli.yml", "ui.yml"];

/// An ordered, validated list of software descriptors.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<SoftwareDescriptor>,
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut entries = Vec::new();
        for name in CATALOG_FILES {
            let path = PathBuf::from("catalog").join(name);
            let file = CATALOG_DIR
                .get_file(name)
                .ok_or_else(|| DevstrapError::ConfigNotFound { path: path.clone() })?;
            let content =
                file.contents_utf8()
                    .ok_or_else(|| DevstrapError::ConfigParseError {
                        path: path.clone(),
                        message: "Invalid UTF-8".to_string(),
                    })?;
            entries.extend(parse_entries(content, &path)?);
        }
        Self::from_entries(entries, Path::new("catalog"))
    }

    /// Build a catalog from descriptors.
    ///
    /// Command-line entries are moved ahead of desktop applications; order
    /// within each category is kept.
    ///
    /// # Errors
    ///
    /// [`DevstrapError::ConfigParseError`] naming `source` if an entry has
    /// an empty id or two entries share an id.
    pub fn from_entries(mut entries: Vec<SoftwareDescriptor>, source: &Path) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            let id = entry.id();
            if id.is_empty() {
                return Err(DevstrapError::ConfigParseError {
                    path: source.to_path_buf(),
                    message: format!("software name '{}' has no usable id", entry.name),
                });
            }
            if !seen.insert(id.clone()) {
                return Err(DevstrapError::ConfigParseError {
                    path: source.to_path_buf(),
                    message: format!("duplicate software id '{}'", id),
                });
            }
            if entry.check.is_none() {
                tracing::debug!("'{}' declares no installation check", entry.name);
            }
        }

        entries.sort_by_key(|e| e.category);
        Ok(Self { entries })
    }

    /// All entries in install order.
    pub fn entries(&self) -> &[SoftwareDescriptor] {
        &self.entries
    }

    /// All ids in install order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    /// Look up an entry by id or display name.
    pub fn get(&self, id_or_name: &str) -> Option<&SoftwareDescriptor> {
        let id = idify(id_or_name);
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Entries to provision on `platform`.
    ///
    /// An empty `requested` list selects everything valid on the platform.
    /// Requested names are normalized like ids. Requested entries that
    /// exist but do not support the platform are dropped.
    ///
    /// # Errors
    ///
    /// [`DevstrapError::UnknownSoftware`] for the first requested name that
    /// matches no entry at all.
    pub fn select(
        &self,
        platform: Platform,
        requested: &[String],
    ) -> Result<Vec<&SoftwareDescriptor>> {
        let wanted: Vec<String> = requested.iter().map(|r| idify(r)).collect();

        if let Some(unknown) = wanted.iter().find(|id| self.get(id).is_none()) {
            return Err(DevstrapError::UnknownSoftware {
                id: unknown.clone(),
                available: self.ids().join(", "),
            });
        }

        let selected = self
            .entries
            .iter()
            .filter(|e| wanted.is_empty() || wanted.contains(&e.id()))
            .filter(|e| {
                let ok = e.supports(platform);
                if !ok && !wanted.is_empty() {
                    tracing::warn!("'{}' is not available on {}, skipping", e.name, platform);
                }
                ok
            })
            .collect();
        Ok(selected)
    }
}

/// Parse a YAML list of descriptors.
pub fn parse_entries(content: &str, source: &Path) -> Result<Vec<SoftwareDescriptor>> {
    serde_yaml::from_str(content).map_err(|e| DevstrapError::ConfigParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::software::{BrewPackage, Category, HookStep, InstallMethod, InstallationCheck};

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        let ids = catalog.ids();

        assert_eq!(ids.first().map(String::as_str), Some("zsh"));
        assert!(ids.contains(&"oh-my-zsh".to_string()));
        assert!(ids.contains(&"visual-studio-code".to_string()));
        assert!(ids.contains(&"github-desktop".to_string()));
    }

    #[test]
    fn builtin_catalog_parses_nested_methods_and_hooks() {
        let catalog = Catalog::builtin().unwrap();

        let zsh = catalog.get("zsh").unwrap();
        assert_eq!(
            zsh.check,
            Some(InstallationCheck::Commands(vec!["zsh".into()]))
        );
        assert_eq!(
            zsh.methods,
            vec![
                InstallMethod::Brew(BrewPackage::formula("zsh").mac_only()),
                InstallMethod::SystemPackages(vec!["zsh".into()]),
            ]
        );

        let omz = catalog.get("oh-my-zsh").unwrap();
        assert!(matches!(omz.check, Some(InstallationCheck::Files(_))));
        assert!(matches!(
            omz.post_install.first(),
            Some(HookStep::Symlink { link, .. }) if link == "~/.zsh"
        ));
        assert!(matches!(omz.post_install.last(), Some(HookStep::Notice(_))));

        let chrome = catalog.get("chrome").unwrap();
        assert!(matches!(
            chrome.methods.last(),
            Some(InstallMethod::EopkgThirdParty { package_file_pattern, .. })
                if package_file_pattern == "google-chrome-*.eopkg"
        ));
    }

    #[test]
    fn parse_entries_reads_single_key_maps() {
        let entries = parse_entries(
            r#"
- name: Ripgrep
  platforms: [darwin, linux]
  check: { commands: [rg] }
  methods:
    - brew: { formula: ripgrep }
    - system_packages: [ripgrep]
  post_install:
    - shell: rg --version
"#,
            Path::new("config.yml"),
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].methods.len(), 2);
        assert_eq!(entries[0].post_install, vec![HookStep::Shell("rg --version".into())]);
    }

    #[test]
    fn builtin_catalog_puts_cli_before_ui() {
        let catalog = Catalog::builtin().unwrap();
        let first_ui = catalog
            .entries()
            .iter()
            .position(|e| e.category == Category::Ui)
            .unwrap();
        assert!(catalog.entries()[first_ui..]
            .iter()
            .all(|e| e.category == Category::Ui));
        assert!(first_ui > 0);
    }

    #[test]
    fn every_builtin_entry_has_a_check() {
        let catalog = Catalog::builtin().unwrap();
        for entry in catalog.entries() {
            assert!(entry.check.is_some(), "{} has no check", entry.name);
            assert!(!entry.methods.is_empty(), "{} has no methods", entry.name);
        }
    }

    #[test]
    fn builtin_vscode_snap_is_classic() {
        let catalog = Catalog::builtin().unwrap();
        let code = catalog.get("Visual Studio Code").unwrap();
        assert!(code.methods.iter().any(|m| matches!(
            m,
            InstallMethod::Snap(s) if s.package == "code" && s.classic
        )));
    }

    #[test]
    fn from_entries_rejects_duplicate_ids() {
        let entries = vec![
            SoftwareDescriptor::new("Zsh", &[Platform::Linux]),
            SoftwareDescriptor::new("zsh", &[Platform::MacOs]),
        ];
        let err = Catalog::from_entries(entries, Path::new("config.yml")).unwrap_err();
        assert!(err.to_string().contains("duplicate software id 'zsh'"));
    }

    #[test]
    fn from_entries_rejects_empty_id() {
        let entries = vec![SoftwareDescriptor::new("!!!", &[Platform::Linux])];
        assert!(Catalog::from_entries(entries, Path::new("config.yml")).is_err());
    }

    #[test]
    fn from_entries_orders_by_category_stably() {
        let entries = vec![
            SoftwareDescriptor::new("Slack", &[Platform::Linux]).with_category(Category::Ui),
            SoftwareDescriptor::new("Zsh", &[Platform::Linux]),
            SoftwareDescriptor::new("Chrome", &[Platform::Linux]).with_category(Category::Ui),
            SoftwareDescriptor::new("Nix", &[Platform::Linux]),
        ];
        let catalog = Catalog::from_entries(entries, Path::new("x")).unwrap();
        assert_eq!(catalog.ids(), vec!["zsh", "nix", "slack", "chrome"]);
    }

    #[test]
    fn select_filters_by_platform() {
        let catalog = Catalog::builtin().unwrap();
        let mac: Vec<String> = catalog
            .select(Platform::MacOs, &[])
            .unwrap()
            .iter()
            .map(|e| e.id())
            .collect();
        assert!(mac.contains(&"zsh".to_string()));
        assert!(!mac.contains(&"snap".to_string()));
        assert!(!mac.contains(&"flatpak".to_string()));
    }

    #[test]
    fn select_honours_allow_list_and_normalizes_names() {
        let catalog = Catalog::builtin().unwrap();
        let selected = catalog
            .select(
                Platform::Linux,
                &["Oh My Zsh".to_string(), "zsh".to_string()],
            )
            .unwrap();
        let ids: Vec<String> = selected.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["zsh", "oh-my-zsh"]);
    }

    #[test]
    fn select_drops_entries_for_other_platforms() {
        let catalog = Catalog::builtin().unwrap();
        let selected = catalog
            .select(Platform::MacOs, &["snap".to_string()])
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn select_rejects_unknown_ids() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog
            .select(Platform::Linux, &["emacs".to_string()])
            .unwrap_err();
        match err {
            DevstrapError::UnknownSoftware { id, available } => {
                assert_eq!(id, "emacs");
                assert!(available.contains("zsh"));
            }
            other => panic!("expected UnknownSoftware, got {other:?}"),
        }
    }

    #[test]
    fn parse_entries_reports_source_path() {
        let err = parse_entries("- name: [", Path::new("/tmp/custom.yml")).unwrap_err();
        assert!(err.to_string().contains("/tmp/custom.yml"));
    }
}
