//! The Firedrake installer: download, flags, and execution.

pub mod fetch;
pub mod flags;
pub mod runner;

pub use fetch::{
    download_installer, sha256_hex, use_local_installer, verify_checksum, write_installer,
    HttpFetcher,
};
pub use flags::InstallerFlags;
pub use runner::{installer_env, run_installer, Installer, InstallerInvocation, ScriptInstaller};

use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::ui::UserInterface;
use std::path::PathBuf;

/// Make the installer script available on disk.
///
/// Uses `--installer-path` when given, otherwise downloads from the
/// configured URL into the software directory.
pub fn prepare_installer(config: &BootstrapConfig, ui: &mut dyn UserInterface) -> Result<PathBuf> {
    let pinned = config.installer.sha256.as_deref();

    if let Some(path) = &config.installer_path {
        tracing::info!("Using local installer {}", path.display());
        return use_local_installer(path, pinned);
    }

    let dest = config.installer_script();
    let mut spinner = ui.start_spinner(&format!("Downloading {}", config.installer.url));

    let fetched = HttpFetcher::new()
        .and_then(|fetcher| download_installer(&fetcher, &config.installer.url, &dest, pinned));

    match fetched {
        Ok(path) => {
            spinner.finish_success(&format!("Downloaded installer to {}", path.display()));
            Ok(path)
        }
        Err(e) => {
            spinner.finish_error("Installer download failed");
            Err(e)
        }
    }
}
