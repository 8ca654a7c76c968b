//! Child process execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{display_command, execute, CommandOptions, CommandResult};
pub use platform::{is_ci, is_ci_with_env};
