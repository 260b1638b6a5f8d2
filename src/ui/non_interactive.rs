//! Plain line output for CI and pipes.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Writes whole lines only, never moves the cursor.
///
/// Results go to stdout; warnings, failures and error blocks go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_command_output() {
            println!("{}", message);
        }
        Box::new(ResultLine)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_headers() {
            println!("\n{}\n", title);
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str) {
        eprint!("{}", error_block(command, output));
    }
}

/// Box-drawn block naming a failed command and its output.
pub(crate) fn error_block(command: &str, output: &str) -> String {
    let mut block = format!("    ┌─ Command\n    │ {}\n", command);
    if !output.is_empty() {
        block.push_str("    ├─ Output\n");
        for line in output.lines() {
            block.push_str(&format!("    │ {}\n", line));
        }
    }
    block.push_str("    └─\n");
    block
}

struct ResultLine;

impl SpinnerHandle for ResultLine {
    fn finish_success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("○ {}", msg);
    }
}
