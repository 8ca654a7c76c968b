//! Check command implementation.
//!
//! `firedrake-bootstrap check` validates prerequisites and prints the
//! configuration report without installing anything.

use crate::bootstrap::{Bootstrapper, RunOptions};
use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The check command implementation.
pub struct CheckCommand {
    source: ConfigSource,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(source: ConfigSource, args: CheckArgs) -> Self {
        Self { source, args }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (config, _) = self.source.resolve(&self.args.overrides.to_overrides(None))?;

        Bootstrapper::new(&config, RunOptions::default()).check(ui)?;
        ui.success("All prerequisites found");
        Ok(CommandResult::success())
    }
}
