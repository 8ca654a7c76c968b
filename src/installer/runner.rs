//! Running the installer.

use crate::config::{BootstrapConfig, EnvLayer, EnvLayerStack};
use crate::error::{BootstrapError, Result};
use crate::shell::{display_command, execute, CommandOptions, CommandResult};
use std::path::PathBuf;

use super::flags::InstallerFlags;

/// One installer invocation, fully described.
#[derive(Debug, Clone)]
pub struct InstallerInvocation {
    /// Interpreter that runs the script.
    pub python: String,
    /// The installer script.
    pub script: PathBuf,
    /// Flags after the script path.
    pub flags: InstallerFlags,
    /// Working directory (the software directory).
    pub cwd: PathBuf,
    /// Environment changes for the child.
    pub env: EnvLayerStack,
}

impl InstallerInvocation {
    /// Describe the installer run for `config` using `script`.
    pub fn new(config: &BootstrapConfig, script: PathBuf) -> Self {
        Self {
            python: config.installer.python.clone(),
            script,
            flags: InstallerFlags::from_config(config),
            cwd: config.software_dir.clone(),
            env: installer_env(config),
        }
    }

    /// Full argument list: the script followed by its flags.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.script.display().to_string()];
        args.extend(self.flags.to_args());
        args
    }

    /// The command line as it would be typed.
    pub fn display(&self) -> String {
        display_command(&self.python, &self.args())
    }
}

/// Environment for the installer: every exported variable, with
/// `PYTHONPATH` removed so that user packages cannot leak into the build.
pub fn installer_env(config: &BootstrapConfig) -> EnvLayerStack {
    let mut stack = EnvLayerStack::new();
    stack.push(config.exported_layer());

    let mut isolate = EnvLayer::new("installer");
    isolate.unset("PYTHONPATH");
    stack.push(isolate);
    stack
}

/// Runs `firedrake-install`.
///
/// The installer is opaque: it is handed its flags and reports only an
/// exit status.
pub trait Installer {
    /// Run the installer to completion.
    fn run(&mut self, invocation: &InstallerInvocation) -> Result<CommandResult>;
}

/// Runs the installer script as a child process with inherited stdio.
#[derive(Debug, Default)]
pub struct ScriptInstaller;

impl Installer for ScriptInstaller {
    fn run(&mut self, invocation: &InstallerInvocation) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: Some(invocation.cwd.clone()),
            env: invocation.env.resolve(),
            ..Default::default()
        };
        execute(&invocation.python, &invocation.args(), &options)
    }
}

/// Run the installer and turn a non-zero exit into an error.
pub fn run_installer(
    installer: &mut dyn Installer,
    invocation: &InstallerInvocation,
) -> Result<CommandResult> {
    tracing::info!("Running installer: {}", invocation.display());
    let result = installer.run(invocation)?;

    if !result.success {
        return Err(BootstrapError::InstallerFailed {
            code: result.exit_code,
        });
    }
    tracing::info!("Installer finished in {:?}", result.duration);
    Ok(result)
}
