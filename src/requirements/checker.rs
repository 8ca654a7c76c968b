//! Prerequisite path checks.
//!
//! The installer builds against a fixed MPI toolchain and an existing PETSc
//! tree. Both must be on disk before anything is downloaded or run.

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::requirements::probe::is_executable;
use std::path::PathBuf;

/// What kind of filesystem entry a requirement expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A compiler or launcher binary.
    Tool,
    /// An installation directory.
    Directory,
}

/// A path that has to exist before the installer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRequirement {
    /// Variable name the path is known by (e.g. `MPICC`).
    pub name: &'static str,
    /// Expected location.
    pub path: PathBuf,
    /// Expected entry kind.
    pub kind: PathKind,
}

impl PathRequirement {
    /// Whether the expected entry is present.
    pub fn is_present(&self) -> bool {
        match self.kind {
            PathKind::Tool => self.path.exists(),
            PathKind::Directory => self.path.is_dir(),
        }
    }
}

/// The fixed list of required paths, in check order.
pub fn required_paths(config: &BootstrapConfig) -> Vec<PathRequirement> {
    let mut required: Vec<PathRequirement> = config
        .mpi
        .tools()
        .iter()
        .map(|&(name, path)| PathRequirement {
            name,
            path: path.to_path_buf(),
            kind: PathKind::Tool,
        })
        .collect();
    required.push(PathRequirement {
        name: "PETSC_DIR",
        path: config.petsc_dir.clone(),
        kind: PathKind::Directory,
    });
    required
}

/// Check every required path, stopping at the first one that is missing.
///
/// # Errors
///
/// Returns `MissingPath` naming the variable and the path that was
/// expected.
pub fn validate_prerequisites(config: &BootstrapConfig) -> Result<()> {
    check_paths(&required_paths(config))
}

/// Fail-fast check over an explicit list of requirements.
pub fn check_paths(required: &[PathRequirement]) -> Result<()> {
    for req in required {
        if !req.is_present() {
            tracing::debug!("{} missing at {}", req.name, req.path.display());
            return Err(BootstrapError::MissingPath {
                name: req.name.to_string(),
                path: req.path.clone(),
            });
        }
        if req.kind == PathKind::Tool && !is_executable(&req.path) {
            tracing::warn!(
                "{} exists at {} but is not executable",
                req.name,
                req.path.display()
            );
        }
        tracing::debug!("{} found at {}", req.name, req.path.display());
    }
    Ok(())
}
