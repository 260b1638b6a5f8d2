//! Output verbosity.

/// How much devstrap prints while provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Installer output goes straight to the terminal; no spinners.
    Verbose,
    #[default]
    Normal,
    /// Per-package results only, without the run banner.
    Quiet,
}

impl From<crate::config::OutputMode> for OutputMode {
    fn from(config_mode: crate::config::OutputMode) -> Self {
        match config_mode {
            crate::config::OutputMode::Verbose => Self::Verbose,
            crate::config::OutputMode::Normal => Self::Normal,
            crate::config::OutputMode::Quiet => Self::Quiet,
        }
    }
}

impl OutputMode {
    /// Installer commands write to the terminal instead of being captured.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Streaming output would tear an animated spinner.
    pub fn shows_spinners(&self) -> bool {
        !self.shows_command_output()
    }

    pub fn shows_headers(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_verbose_streams_command_output() {
        assert!(OutputMode::Verbose.shows_command_output());
        assert!(!OutputMode::Normal.shows_command_output());
        assert!(!OutputMode::Quiet.shows_command_output());
    }

    #[test]
    fn verbose_skips_spinners() {
        assert!(!OutputMode::Verbose.shows_spinners());
        assert!(OutputMode::Normal.shows_spinners());
        assert!(OutputMode::Quiet.shows_spinners());
    }

    #[test]
    fn quiet_hides_headers() {
        assert!(!OutputMode::Quiet.shows_headers());
        assert!(OutputMode::Normal.shows_headers());
        assert!(OutputMode::Verbose.shows_headers());
    }

    #[test]
    fn from_config_modes() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
        assert_eq!(
            OutputMode::from(crate::config::OutputMode::Quiet),
            OutputMode::Quiet
        );
        assert_eq!(
            OutputMode::from(crate::config::OutputMode::Verbose),
            OutputMode::Verbose
        );
    }
}
