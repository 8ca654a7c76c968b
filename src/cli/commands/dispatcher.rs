//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands
//! - [`ConfigSource`] for loading the run configuration

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_settings, BootstrapConfig, ConfigOverrides};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where the settings file is looked up.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    working_dir: PathBuf,
    settings_path: Option<PathBuf>,
}

impl ConfigSource {
    /// Create a source rooted at `working_dir`.
    pub fn new(working_dir: PathBuf, settings_path: Option<PathBuf>) -> Self {
        Self {
            working_dir,
            settings_path,
        }
    }

    /// Directory searched for `firedrake-bootstrap.yml`.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Load settings and resolve them against the process environment.
    ///
    /// Returns the configuration and the settings file that was read, if any.
    pub fn resolve(
        &self,
        overrides: &ConfigOverrides,
    ) -> Result<(BootstrapConfig, Option<PathBuf>)> {
        let (settings, path) = load_settings(&self.working_dir, self.settings_path.as_deref())?;
        let config = BootstrapConfig::resolve(settings, overrides)?;
        Ok((config, path))
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source: ConfigSource,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(working_dir: PathBuf, settings_path: Option<PathBuf>) -> Self {
        Self {
            source: ConfigSource::new(working_dir, settings_path),
        }
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        self.source.working_dir()
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Check(args)) => {
                let cmd = super::check::CheckCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Config(args)) => {
                let cmd = super::config::ConfigCommand::new(self.source.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                // Default to run command with default args
                let cmd = super::run::RunCommand::new(
                    self.source.clone(),
                    crate::cli::args::RunArgs::default(),
                );
                cmd.execute(ui)
            }
        }
    }
}
