//! External command execution and host process checks.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    format_command, is_executable, parse_system_path, resolve_tool_path, CommandOptions,
    CommandResult, ProcessRunner, SystemRunner,
};
pub use mock::{MockRunner, RecordedCall};
pub use platform::{is_ci, is_elevated};
