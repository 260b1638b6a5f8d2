//! Colors and result glyphs.

use console::Style;

/// Styles for each kind of line devstrap prints.
#[derive(Debug, Clone)]
pub struct DevstrapTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Skipped results, list names, error blocks.
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
}

impl DevstrapTheme {
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
        }
    }

    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
        }
    }

    /// Plain when `NO_COLOR` is set (https://no-color.org/) or stdout is
    /// not a terminal.
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(format!("✓ {}", msg)).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        self.warning.apply_to(format!("⚠ {}", msg)).to_string()
    }

    pub fn format_error(&self, msg: &str) -> String {
        self.error.apply_to(format!("✗ {}", msg)).to_string()
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        self.dim.apply_to(format!("○ {}", msg)).to_string()
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{} {}", self.header.apply_to("▸"), self.highlight.apply_to(title))
    }
}
