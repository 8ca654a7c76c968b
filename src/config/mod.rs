//! Configuration for a bootstrap run.
//!
//! - Settings file schema in [`schema`]
//! - Settings file discovery and loading in [`loader`]
//! - Environment layering for child processes in [`env_layer`]
//! - The resolved, immutable run configuration in [`resolved`]
//!
//! # Example
//!
//! ```
//! use firedrake_bootstrap::config::{BootstrapConfig, ConfigOverrides, Settings};
//! use std::path::PathBuf;
//!
//! let overrides = ConfigOverrides {
//!     petsc_dir: Some(PathBuf::from("/opt/petsc")),
//!     petsc_arch: Some("arch-linux-c-opt".to_string()),
//!     software_dir: Some(PathBuf::from("/opt/software")),
//!     ..Default::default()
//! };
//! let config = BootstrapConfig::resolve(Settings::default(), &overrides).unwrap();
//! assert_eq!(config.install_dir, PathBuf::from("/opt/software/firedrake-pragmatic"));
//! ```

pub mod env_layer;
pub mod loader;
pub mod resolved;
pub mod schema;

pub use env_layer::{EnvLayer, EnvLayerStack, ResolvedEnv};
pub use loader::{
    discover_settings, load_settings, load_settings_file, parse_settings, SETTINGS_FILE_NAME,
};
pub use resolved::{BootstrapConfig, ConfigOverrides, ValueSource, INSTALLER_FILE_NAME};
pub use schema::{
    InstallerSettings, MpiToolchain, PackageBranch, Settings, SmokeTestSettings,
    DEFAULT_INSTALLER_URL, DEFAULT_VENV_NAME,
};
