//! Run command implementation.
//!
//! `firedrake-bootstrap run` (or no subcommand at all) performs the whole
//! bootstrap: checks, report, confirmation, install and smoke test.

use crate::bootstrap::{Bootstrapper, RunOptions};
use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::installer::ScriptInstaller;
use crate::shell::is_ci;
use crate::smoke::ProcessSmokeRunner;
use crate::ui::{create_gate, UserInterface};

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// The run command implementation.
pub struct RunCommand {
    source: ConfigSource,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(source: ConfigSource, args: RunArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Whether the confirmation pause is skipped.
    fn auto_confirm(&self) -> bool {
        self.args.yes || is_ci()
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = self
            .args
            .overrides
            .to_overrides(self.args.installer_path.clone());
        let (config, settings_path) = self.source.resolve(&overrides)?;

        if let Some(path) = &settings_path {
            if ui.output_mode().shows_sources() {
                ui.message(&format!("Settings: {}", path.display()));
            }
        }

        let options = RunOptions {
            dry_run: self.args.dry_run,
        };
        let mut gate = create_gate(self.auto_confirm());

        let summary = Bootstrapper::new(&config, options).run(
            ui,
            gate.as_mut(),
            &mut ScriptInstaller,
            &mut ProcessSmokeRunner,
        )?;

        if summary.dry_run {
            ui.success("Dry run complete");
        } else {
            ui.success(&format!(
                "Firedrake is ready in {}",
                summary.install_dir.display()
            ));
        }
        Ok(CommandResult::success())
    }
}
