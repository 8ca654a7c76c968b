//! firedrake-bootstrap - set up Firedrake with Pragmatic on an existing PETSc.
//!
//! The tool checks that an MPICH toolchain and a PETSc build are in place,
//! prints the configuration it will use, waits for the operator, then runs
//! the upstream `firedrake-install` script against them. Once the virtual
//! environment exists it is activated and a single mesh-adaptation
//! regression test is run to prove the install works.
//!
//! # Modules
//!
//! - [`bootstrap`] - Step orchestration and the configuration report
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings file, environment resolution and env layering
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Installer download, flags and execution
//! - [`requirements`] - Prerequisite path checks
//! - [`shell`] - Child process execution
//! - [`smoke`] - Post-install smoke test
//! - [`ui`] - Terminal output, spinners and the confirmation gate
//! - [`venv`] - Virtual environment activation
//!
//! # Example
//!
//! ```
//! use firedrake_bootstrap::config::{BootstrapConfig, ConfigOverrides, Settings};
//! use firedrake_bootstrap::installer::InstallerFlags;
//!
//! let overrides = ConfigOverrides {
//!     petsc_dir: Some("/opt/petsc".into()),
//!     petsc_arch: Some("arch-linux-c-opt".into()),
//!     software_dir: Some("/opt/software".into()),
//!     ..Default::default()
//! };
//! let config = BootstrapConfig::resolve(Settings::default(), &overrides).unwrap();
//! let args = InstallerFlags::from_config(&config).to_args();
//! assert_eq!(args[0], "--honour-petsc-dir");
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod requirements;
pub mod shell;
pub mod smoke;
pub mod ui;
pub mod venv;

pub use error::{BootstrapError, Result};
