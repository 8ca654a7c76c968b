//! The configuration report shown before the gate.

use crate::config::BootstrapConfig;
use crate::requirements::{resolve_tool_path, split_path};
use crate::ui::UserInterface;
use std::path::{Path, PathBuf};

/// Placeholder for an interpreter that is not on `PATH`.
pub const NOT_FOUND: &str = "not found";

/// The interpreter the installer will be launched with, looked up on the
/// inbound `PATH`.
pub fn active_interpreter(config: &BootstrapConfig) -> Option<PathBuf> {
    resolve_tool_path(
        &config.installer.python,
        &split_path(config.base_path.as_deref()),
    )
}

/// One line per variable, then the interpreter line.
///
/// With `with_sources`, each variable line is followed by where its value
/// came from.
pub fn report_lines(
    config: &BootstrapConfig,
    interpreter: Option<&Path>,
    with_sources: bool,
) -> Vec<String> {
    let mut lines: Vec<String> = config
        .variables()
        .into_iter()
        .map(|(name, value)| match config.source_of(name) {
            Some(source) if with_sources => format!("{}: {}  ({})", name, value, source),
            _ => format!("{}: {}", name, value),
        })
        .collect();

    let location = interpreter
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string());
    lines.push(format!("{}: {}", config.installer.python, location));
    lines
}

/// Print the resolved configuration.
pub fn report_configuration(config: &BootstrapConfig, ui: &mut dyn UserInterface) {
    let interpreter = active_interpreter(config);
    if interpreter.is_none() {
        tracing::warn!("{} is not on PATH", config.installer.python);
    }

    let with_sources = ui.output_mode().shows_sources();
    for line in report_lines(config, interpreter.as_deref(), with_sources) {
        ui.message(&line);
    }
}
