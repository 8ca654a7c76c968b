//! Config command implementation.
//!
//! `firedrake-bootstrap config` shows the resolved configuration, where each
//! value came from, and the environment the installer will see. Paths are
//! not checked.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::ConfigArgs;
use crate::config::{BootstrapConfig, ValueSource};
use crate::error::{BootstrapError, Result};
use crate::installer::{installer_env, InstallerFlags};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigSource};

/// Machine-readable form of `config --json`.
#[derive(Debug, Serialize)]
pub struct ConfigReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
    pub config: &'a BootstrapConfig,
    pub sources: &'a BTreeMap<&'static str, ValueSource>,
    pub installer_args: Vec<String>,
}

/// The config command implementation.
pub struct ConfigCommand {
    source: ConfigSource,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(source: ConfigSource, args: ConfigArgs) -> Self {
        Self { source, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

/// Human-readable lines for `config`.
pub fn config_lines(config: &BootstrapConfig, settings_file: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(path) = settings_file {
        lines.push(format!("# {}", path.display()));
        lines.push(String::new());
    }

    for (name, value) in config.variables() {
        match config.source_of(name) {
            Some(source) => lines.push(format!("{}={}  ({})", name, value, source)),
            None => lines.push(format!("{}={}", name, value)),
        }
    }

    lines.push(String::new());
    match &config.installer_path {
        Some(path) => lines.push(format!("installer: {}", path.display())),
        None => lines.push(format!("installer: {}", config.installer.url)),
    }
    lines.push(format!(
        "installer sha256: {}",
        config.installer.sha256.as_deref().unwrap_or("not pinned")
    ));
    lines.push(format!(
        "smoke test: {}",
        config
            .install_dir
            .join(&config.smoke_test.dir)
            .join(&config.smoke_test.script)
            .display()
    ));

    lines.push(String::new());
    lines.push("Installer environment:".to_string());
    let env = installer_env(config);
    let resolved = env.resolve();
    for (key, value) in &resolved.set {
        let layer = env.source_of(key).unwrap_or("inherited");
        lines.push(format!("  {}={}  [{}]", key, value, layer));
    }
    for key in &resolved.removed {
        let layer = env.source_of(key).unwrap_or("inherited");
        lines.push(format!("  {} unset  [{}]", key, layer));
    }
    lines
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (config, settings_file) =
            self.source.resolve(&self.args.overrides.to_overrides(None))?;

        if self.args.json {
            let report = ConfigReport {
                settings_file,
                config: &config,
                sources: &config.sources,
                installer_args: InstallerFlags::from_config(&config).to_args(),
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| BootstrapError::Other(e.into()))?;
            ui.message(&json);
        } else {
            for line in config_lines(&config, settings_file.as_deref()) {
                ui.message(&line);
            }
        }

        Ok(CommandResult::success())
    }
}
