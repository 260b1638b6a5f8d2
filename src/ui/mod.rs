//! Terminal user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait so provisioning code never writes to the
//!   terminal directly
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI and piped output
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use devstrap::ui::{create_ui, OutputMode};
//!
//! // Non-interactive mode keeps doctests free of terminal control codes
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("devstrap");
//! ui.success("All done");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::DevstrapTheme;

/// Everything provisioning code prints goes through this trait.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Config can lower or raise verbosity after the UI exists.
    fn set_output_mode(&mut self, mode: OutputMode);

    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// One spinner per package; the caller must finish it.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Run banner. Hidden in quiet mode.
    fn show_header(&mut self, title: &str);

    /// A failed installer command and whatever it printed.
    fn show_error_block(&mut self, command: &str, output: &str);
}

/// The final line for one package.
pub trait SpinnerHandle {
    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    /// Already installed, or planned in a dry run.
    fn finish_skipped(&mut self, msg: &str);
}
