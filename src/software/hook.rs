//! Post-install hook steps.

use serde::{Deserialize, Serialize};

/// One step of a post-install hook. Steps run in order after a
/// successful install; a failing step stops the hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookStep {
    /// Shell text run with `sh -c`.
    Shell(String),

    /// Symlink `link` to `source`; both accept `~/`. An existing `link`
    /// is left alone.
    Symlink { source: String, link: String },

    /// Text shown to the user.
    Notice(String),

    /// Extra packages for the desktop environment, installed with the
    /// system package manager only when a desktop shell is running.
    DesktopPackages(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::software::parse_yaml;

    #[test]
    fn parses_hook_list() {
        let steps: Vec<HookStep> = parse_yaml(
            r#"
- shell: flatpak remote-add --if-not-exists flathub https://flathub.org/repo/flathub.flatpakrepo
- desktop_packages: [gnome-software-plugin-flatpak]
- symlink: { source: "~/.oh-my-zsh", link: "~/.zsh" }
- notice: Update your ~/.zshrc
"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[1], HookStep::DesktopPackages(ref p) if p.len() == 1));
        assert_eq!(
            steps[2],
            HookStep::Symlink {
                source: "~/.oh-my-zsh".into(),
                link: "~/.zsh".into()
            }
        );
    }
}
