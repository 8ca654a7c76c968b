//! Virtual environment activation.
//!
//! Activation never touches the bootstrapper's own process environment.
//! It produces an [`ActivatedEnvironment`] whose layers are applied to the
//! children that need the venv (the smoke test).

use crate::config::{BootstrapConfig, EnvLayer, EnvLayerStack, ResolvedEnv};
use crate::error::{BootstrapError, Result};
use crate::requirements::{resolve_tool_path, split_path};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Directory holding the venv's executables.
pub const VENV_BIN_DIR: &str = "bin";

/// Script whose presence marks a usable virtual environment.
pub const ACTIVATE_SCRIPT: &str = "activate";

/// The environment children see once the venv is active.
///
/// # Example
///
/// ```
/// use firedrake_bootstrap::config::{BootstrapConfig, ConfigOverrides, Settings};
/// use firedrake_bootstrap::venv::ActivatedEnvironment;
/// use firedrake_bootstrap::BootstrapError;
///
/// let dir = tempfile::tempdir().unwrap();
/// let overrides = ConfigOverrides {
///     petsc_dir: Some("/opt/petsc".into()),
///     petsc_arch: Some("arch".into()),
///     software_dir: Some(dir.path().to_path_buf()),
///     ..Default::default()
/// };
/// let config = BootstrapConfig::resolve(Settings::default(), &overrides).unwrap();
///
/// // No installer has run yet, so there is nothing to activate.
/// let err = ActivatedEnvironment::activate(&config).unwrap_err();
/// assert!(matches!(err, BootstrapError::VenvMissing { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct ActivatedEnvironment {
    root: PathBuf,
    path_entries: Vec<PathBuf>,
    env: EnvLayerStack,
}

impl ActivatedEnvironment {
    /// Activate the venv at `config.install_dir`.
    pub fn activate(config: &BootstrapConfig) -> Result<Self> {
        let root = config.install_dir.clone();
        let bin_dir = root.join(VENV_BIN_DIR);
        let activate = bin_dir.join(ACTIVATE_SCRIPT);
        if !activate.is_file() {
            return Err(BootstrapError::VenvMissing { path: activate });
        }

        let mut path_entries = vec![bin_dir];
        path_entries.extend(split_path(config.base_path.as_deref()));
        let joined = std::env::join_paths(&path_entries)
            .context("Virtual environment path cannot be placed on PATH")?;

        let mut venv = EnvLayer::new("venv");
        venv.set("VIRTUAL_ENV", root.display().to_string());
        venv.set("PATH", joined.to_string_lossy());
        venv.unset("PYTHONHOME");
        match &config.saved_pythonpath {
            Some(saved) => venv.set("PYTHONPATH", saved.clone()),
            None => venv.unset("PYTHONPATH"),
        }

        let mut env = EnvLayerStack::new();
        env.push(config.exported_layer());
        env.push(venv);

        tracing::info!("Activated virtual environment {}", root.display());
        Ok(Self {
            root,
            path_entries,
            env,
        })
    }

    /// The venv root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `PATH` entries, venv first.
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path_entries
    }

    /// Layered environment, for inspection.
    pub fn layers(&self) -> &EnvLayerStack {
        &self.env
    }

    /// Net environment changes for a child process.
    pub fn env(&self) -> ResolvedEnv {
        self.env.resolve()
    }

    /// Find `tool` on the activated `PATH`.
    pub fn resolve_tool(&self, tool: &str) -> Option<PathBuf> {
        resolve_tool_path(tool, &self.path_entries)
    }
}
