//! Post-install smoke test.
//!
//! Runs one regression test from the freshly installed Firedrake source
//! tree with the virtual environment active.

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::shell::{display_command, execute, CommandOptions, CommandResult};
use crate::venv::ActivatedEnvironment;
use std::path::PathBuf;

/// One smoke test invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeTest {
    /// Directory the test runs in.
    pub dir: PathBuf,
    /// Test script, relative to `dir`.
    pub script: String,
    /// Interpreter name, looked up on the activated `PATH`.
    pub python: String,
}

impl SmokeTest {
    /// The configured smoke test inside the install directory.
    pub fn from_config(config: &BootstrapConfig) -> Self {
        Self {
            dir: config.install_dir.join(&config.smoke_test.dir),
            script: config.smoke_test.script.clone(),
            python: config.smoke_test.python.clone(),
        }
    }

    /// Interpreter to launch: the venv's copy when it has one.
    pub fn program(&self, venv: &ActivatedEnvironment) -> String {
        venv.resolve_tool(&self.python)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.python.clone())
    }

    /// The command line as it would be typed.
    pub fn display(&self) -> String {
        display_command(&self.python, std::slice::from_ref(&self.script))
    }
}

/// Executes the smoke test.
pub trait SmokeRunner {
    /// Run `test` inside `venv` to completion.
    fn run(&mut self, test: &SmokeTest, venv: &ActivatedEnvironment) -> Result<CommandResult>;
}

/// Runs the smoke test as a child process with inherited stdio.
#[derive(Debug, Default)]
pub struct ProcessSmokeRunner;

impl SmokeRunner for ProcessSmokeRunner {
    fn run(&mut self, test: &SmokeTest, venv: &ActivatedEnvironment) -> Result<CommandResult> {
        let options = CommandOptions {
            cwd: Some(test.dir.clone()),
            env: venv.env(),
            ..Default::default()
        };
        execute(
            &test.program(venv),
            std::slice::from_ref(&test.script),
            &options,
        )
    }
}

/// Run the smoke test and turn a non-zero exit into an error.
pub fn run_smoke_test(
    runner: &mut dyn SmokeRunner,
    test: &SmokeTest,
    venv: &ActivatedEnvironment,
) -> Result<CommandResult> {
    if !test.dir.is_dir() {
        return Err(BootstrapError::MissingPath {
            name: "smoke test directory".to_string(),
            path: test.dir.clone(),
        });
    }

    tracing::info!("Running smoke test in {}: {}", test.dir.display(), test.display());
    let result = runner.run(test, venv)?;

    if !result.success {
        return Err(BootstrapError::SmokeTestFailed {
            script: test.script.clone(),
            code: result.exit_code,
        });
    }
    Ok(result)
}
