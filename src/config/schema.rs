//! Settings file schema.
//!
//! Every field has a default matching the stock Pragmatic installation, so
//! an empty (or absent) settings file yields the standard bootstrap.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the installer script.
pub const DEFAULT_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/firedrakeproject/firedrake/master/scripts/firedrake-install";

/// Default virtual environment name.
pub const DEFAULT_VENV_NAME: &str = "firedrake-pragmatic";

/// Root structure of `firedrake-bootstrap.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// MPI compiler and launcher paths.
    pub mpi: MpiToolchain,

    /// Name of the virtual environment the installer creates.
    pub venv_name: String,

    /// Base software directory (normally taken from `$SOFTWARE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_dir: Option<PathBuf>,

    /// PETSc installation directory (normally taken from `$PETSC_DIR`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petsc_dir: Option<PathBuf>,

    /// PETSc build architecture (normally taken from `$PETSC_ARCH`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petsc_arch: Option<String>,

    /// Installer download and flag settings.
    pub installer: InstallerSettings,

    /// Post-install verification settings.
    pub smoke_test: SmokeTestSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mpi: MpiToolchain::default(),
            venv_name: DEFAULT_VENV_NAME.to_string(),
            software_dir: None,
            petsc_dir: None,
            petsc_arch: None,
            installer: InstallerSettings::default(),
            smoke_test: SmokeTestSettings::default(),
        }
    }
}

/// Paths to the four MPI tools the installer builds against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpiToolchain {
    pub mpicc: PathBuf,
    pub mpicxx: PathBuf,
    pub mpiexec: PathBuf,
    pub mpif90: PathBuf,
}

impl Default for MpiToolchain {
    fn default() -> Self {
        Self {
            mpicc: PathBuf::from("/usr/bin/mpicc.mpich"),
            mpicxx: PathBuf::from("/usr/bin/mpicxx.mpich"),
            mpiexec: PathBuf::from("/usr/bin/mpiexec.mpich"),
            mpif90: PathBuf::from("/usr/bin/mpif90.mpich"),
        }
    }
}

impl MpiToolchain {
    /// The tools as `(variable name, path)` pairs, in check order.
    pub fn tools(&self) -> [(&'static str, &Path); 4] {
        [
            ("MPICC", self.mpicc.as_path()),
            ("MPICXX", self.mpicxx.as_path()),
            ("MPIEXEC", self.mpiexec.as_path()),
            ("MPIF90", self.mpif90.as_path()),
        ]
    }
}

/// A `--package-branch` override passed to the installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBranch {
    pub package: String,
    pub branch: String,
}

/// How the installer is fetched and invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerSettings {
    /// Where to download the installer script from.
    pub url: String,

    /// Pinned SHA-256 of the installer script (hex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Interpreter used to run the installer.
    pub python: String,

    /// Reuse the PETSc build in `$PETSC_DIR` instead of building one.
    pub honour_petsc_dir: bool,

    /// Additional packages for `--install`.
    pub install: Vec<String>,

    /// Branch overrides for `--package-branch`.
    pub package_branches: Vec<PackageBranch>,

    /// Pass `--disable-ssh`.
    pub disable_ssh: bool,

    /// Additional packages for `--pip-install`.
    pub pip_install: Vec<String>,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_INSTALLER_URL.to_string(),
            sha256: None,
            python: "python3".to_string(),
            honour_petsc_dir: true,
            install: vec!["pyadjoint".to_string()],
            package_branches: vec![PackageBranch {
                package: "firedrake".to_string(),
                branch: "jwallwork23/pragmatic".to_string(),
            }],
            disable_ssh: true,
            pip_install: vec!["parameterized".to_string()],
        }
    }
}

/// The single test run once the environment is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeTestSettings {
    /// Test directory, relative to the virtual environment.
    pub dir: PathBuf,

    /// Test script inside `dir`.
    pub script: String,

    /// Interpreter, resolved through the activated `PATH`.
    pub python: String,
}

impl Default for SmokeTestSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("src/firedrake/tests/regression"),
            script: "test_adapt_pragmatic.py".to_string(),
            python: "python3".to_string(),
        }
    }
}
