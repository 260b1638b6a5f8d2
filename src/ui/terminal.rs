//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use super::non_interactive::error_block;
use super::{DevstrapTheme, NonInteractiveUI, OutputMode, ProgressSpinner, SpinnerHandle, UserInterface};

/// Colored output with one animated spinner per package.
pub struct TerminalUI {
    term: Term,
    theme: DevstrapTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: DevstrapTheme::detect(),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            return Box::new(ProgressSpinner::new(message));
        }
        writeln!(self.term, "{}", self.theme.highlight.apply_to(message)).ok();
        Box::new(ThemedLine {
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_headers() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str) {
        let block = error_block(command, output);
        write!(Term::stderr(), "{}", self.theme.dim.apply_to(block)).ok();
    }
}

/// Final line printed after streamed installer output.
struct ThemedLine {
    theme: DevstrapTheme,
}

impl SpinnerHandle for ThemedLine {
    fn finish_success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("{}", self.theme.format_skipped(msg));
    }
}

/// Terminal UI when stdout is a TTY and we are not in CI, plain lines otherwise.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
