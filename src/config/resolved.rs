//! Resolved bootstrap configuration.
//!
//! [`BootstrapConfig`] is built once at startup from the settings file,
//! command-line overrides, and a snapshot of the process environment.
//! It is immutable afterwards and passed by reference to every step.
//!
//! Precedence for each value: flag > environment > settings file > default.

use crate::config::env_layer::EnvLayer;
use crate::config::schema::{InstallerSettings, MpiToolchain, Settings, SmokeTestSettings};
use crate::error::{BootstrapError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt;
use std::path::PathBuf;

/// Name of the downloaded installer script.
pub const INSTALLER_FILE_NAME: &str = "firedrake-install";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mpicc: Option<PathBuf>,
    pub mpicxx: Option<PathBuf>,
    pub mpiexec: Option<PathBuf>,
    pub mpif90: Option<PathBuf>,
    pub venv_name: Option<String>,
    pub software_dir: Option<PathBuf>,
    pub petsc_dir: Option<PathBuf>,
    pub petsc_arch: Option<String>,
    pub installer_path: Option<PathBuf>,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Command-line flag.
    Flag,
    /// Inherited process environment.
    Environment,
    /// Settings file.
    SettingsFile,
    /// Built-in default.
    Default,
    /// Computed from other values.
    Derived,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::Environment => write!(f, "environment"),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
            Self::Derived => write!(f, "derived"),
        }
    }
}

/// The fully resolved configuration for one run.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapConfig {
    pub mpi: MpiToolchain,
    pub petsc_dir: PathBuf,
    pub petsc_arch: String,
    pub software_dir: PathBuf,
    pub venv_name: String,
    /// `software_dir / venv_name`.
    pub install_dir: PathBuf,
    /// Inbound `PYTHONPATH`, cleared for the installer and restored after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_pythonpath: Option<String>,
    /// Inbound `PATH`.
    #[serde(skip)]
    pub base_path: Option<String>,
    pub installer: InstallerSettings,
    /// Local installer script to use instead of downloading one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_path: Option<PathBuf>,
    pub smoke_test: SmokeTestSettings,
    /// Source of each exported variable.
    #[serde(skip)]
    pub sources: BTreeMap<&'static str, ValueSource>,
}

/// Pick the highest-priority candidate and remember where it came from.
fn pick<T>(
    name: &'static str,
    flag: Option<T>,
    env: Option<T>,
    file: Option<T>,
    sources: &mut BTreeMap<&'static str, ValueSource>,
) -> Option<T> {
    let (value, source) = if let Some(v) = flag {
        (v, ValueSource::Flag)
    } else if let Some(v) = env {
        (v, ValueSource::Environment)
    } else if let Some(v) = file {
        (v, ValueSource::SettingsFile)
    } else {
        return None;
    };
    sources.insert(name, source);
    Some(value)
}

/// Read a variable, treating empty values as unset.
fn non_empty<F>(env_fn: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    env_fn(key).ok().filter(|v| !v.is_empty())
}

/// Resolve one MPI tool path. The settings file only counts when it
/// differs from the default.
fn tool(
    name: &'static str,
    flag: &Option<PathBuf>,
    file: PathBuf,
    default: PathBuf,
    sources: &mut BTreeMap<&'static str, ValueSource>,
) -> Result<PathBuf> {
    let from_file = (file != default).then_some(file);
    let path = pick(name, flag.clone(), None, from_file, sources).unwrap_or_else(|| {
        sources.insert(name, ValueSource::Default);
        default
    });
    absolute(path)
}

/// Anchor a relative path at the current directory.
///
/// Children run with the software directory as their cwd, so every path
/// they are handed must already be absolute.
fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::path::absolute(&path)?)
}

impl BootstrapConfig {
    /// Resolve against the real process environment.
    pub fn resolve(settings: Settings, overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with_env(settings, overrides, |key: &str| std::env::var(key))
    }

    /// Resolve with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn resolve_with_env<F>(
        settings: Settings,
        overrides: &ConfigOverrides,
        env_fn: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let defaults = MpiToolchain::default();
        let mut sources = BTreeMap::new();

        let file = settings.mpi;
        let mpi = MpiToolchain {
            mpicc: tool("MPICC", &overrides.mpicc, file.mpicc, defaults.mpicc, &mut sources)?,
            mpicxx: tool("MPICXX", &overrides.mpicxx, file.mpicxx, defaults.mpicxx, &mut sources)?,
            mpiexec: tool(
                "MPIEXEC",
                &overrides.mpiexec,
                file.mpiexec,
                defaults.mpiexec,
                &mut sources,
            )?,
            mpif90: tool("MPIF90", &overrides.mpif90, file.mpif90, defaults.mpif90, &mut sources)?,
        };

        let petsc_dir = pick(
            "PETSC_DIR",
            overrides.petsc_dir.clone(),
            non_empty(&env_fn, "PETSC_DIR").map(PathBuf::from),
            settings.petsc_dir,
            &mut sources,
        )
        .ok_or_else(|| BootstrapError::MissingVariable {
            name: "PETSC_DIR".to_string(),
        })
        .and_then(absolute)?;

        let petsc_arch = pick(
            "PETSC_ARCH",
            overrides.petsc_arch.clone(),
            non_empty(&env_fn, "PETSC_ARCH"),
            settings.petsc_arch,
            &mut sources,
        )
        .ok_or_else(|| BootstrapError::MissingVariable {
            name: "PETSC_ARCH".to_string(),
        })?;

        let software_dir = pick(
            "SOFTWARE",
            overrides.software_dir.clone(),
            non_empty(&env_fn, "SOFTWARE").map(PathBuf::from),
            settings.software_dir,
            &mut sources,
        )
        .ok_or_else(|| BootstrapError::MissingVariable {
            name: "SOFTWARE".to_string(),
        })
        .and_then(absolute)?;

        let from_file = (settings.venv_name != crate::config::schema::DEFAULT_VENV_NAME)
            .then_some(settings.venv_name);
        let venv_name = pick(
            "FIREDRAKE_ENV",
            overrides.venv_name.clone(),
            None,
            from_file,
            &mut sources,
        )
        .unwrap_or_else(|| {
            sources.insert("FIREDRAKE_ENV", ValueSource::Default);
            crate::config::schema::DEFAULT_VENV_NAME.to_string()
        });
        if venv_name.trim().is_empty() {
            return Err(BootstrapError::MissingVariable {
                name: "FIREDRAKE_ENV".to_string(),
            });
        }

        let install_dir = software_dir.join(&venv_name);
        let installer_path = overrides.installer_path.clone().map(absolute).transpose()?;
        sources.insert("FIREDRAKE_DIR", ValueSource::Derived);

        let config = Self {
            mpi,
            petsc_dir,
            petsc_arch,
            software_dir,
            venv_name,
            install_dir,
            saved_pythonpath: non_empty(&env_fn, "PYTHONPATH"),
            base_path: non_empty(&env_fn, "PATH"),
            installer: settings.installer,
            installer_path,
            smoke_test: settings.smoke_test,
            sources,
        };
        tracing::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// The configuration variables in report order.
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let mut vars: Vec<(&'static str, String)> = self
            .mpi
            .tools()
            .iter()
            .map(|(name, path)| (*name, path.display().to_string()))
            .collect();
        vars.push(("PETSC_DIR", self.petsc_dir.display().to_string()));
        vars.push(("PETSC_ARCH", self.petsc_arch.clone()));
        vars.push(("FIREDRAKE_ENV", self.venv_name.clone()));
        vars.push(("FIREDRAKE_DIR", self.install_dir.display().to_string()));
        vars
    }

    /// Variables exported to every child process.
    pub fn exported_layer(&self) -> EnvLayer {
        let mut layer = EnvLayer::new("bootstrap");
        for (key, value) in self.variables() {
            layer.set(key, value);
        }
        layer
    }

    /// Where the installer script lives (or will be downloaded to).
    pub fn installer_script(&self) -> PathBuf {
        self.installer_path
            .clone()
            .unwrap_or_else(|| self.software_dir.join(INSTALLER_FILE_NAME))
    }

    /// Where a variable's value came from, if tracked.
    pub fn source_of(&self, name: &str) -> Option<ValueSource> {
        self.sources.get(name).copied()
    }
}
