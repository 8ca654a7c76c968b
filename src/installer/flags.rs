//! Installer flag assembly.

use crate::config::{BootstrapConfig, MpiToolchain, PackageBranch};
use serde::Serialize;

/// Options passed to `firedrake-install`.
///
/// Built from the resolved configuration and rendered to an argument list
/// with [`InstallerFlags::to_args`]. The order of the rendered flags is
/// stable so that logs from different runs line up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallerFlags {
    pub honour_petsc_dir: bool,
    pub install: Vec<String>,
    pub venv_name: String,
    pub mpi: MpiToolchain,
    pub package_branches: Vec<PackageBranch>,
    pub disable_ssh: bool,
    pub pip_install: Vec<String>,
}

impl InstallerFlags {
    /// Flags for the given configuration.
    pub fn from_config(config: &BootstrapConfig) -> Self {
        Self {
            honour_petsc_dir: config.installer.honour_petsc_dir,
            install: config.installer.install.clone(),
            venv_name: config.venv_name.clone(),
            mpi: config.mpi.clone(),
            package_branches: config.installer.package_branches.clone(),
            disable_ssh: config.installer.disable_ssh,
            pip_install: config.installer.pip_install.clone(),
        }
    }

    /// Render as command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.honour_petsc_dir {
            args.push("--honour-petsc-dir".to_string());
        }
        for package in &self.install {
            args.push("--install".to_string());
            args.push(package.clone());
        }

        args.push("--venv-name".to_string());
        args.push(self.venv_name.clone());

        for (name, path) in self.mpi.tools() {
            args.push(format!("--{}", name.to_ascii_lowercase()));
            args.push(path.display().to_string());
        }

        for pb in &self.package_branches {
            args.push("--package-branch".to_string());
            args.push(pb.package.clone());
            args.push(pb.branch.clone());
        }

        if self.disable_ssh {
            args.push("--disable-ssh".to_string());
        }
        for package in &self.pip_install {
            args.push("--pip-install".to_string());
            args.push(package.clone());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, Settings};
    use std::env::VarError;

    fn config_with(settings: Settings) -> BootstrapConfig {
        BootstrapConfig::resolve_with_env(settings, &ConfigOverrides::default(), |key: &str| {
            match key {
                "PETSC_DIR" => Ok("/opt/petsc".to_string()),
                "PETSC_ARCH" => Ok("arch-linux-c-opt".to_string()),
                "SOFTWARE" => Ok("/opt/software".to_string()),
                _ => Err(VarError::NotPresent),
            }
        })
        .unwrap()
    }

    #[test]
    fn default_flags_in_order() {
        let flags = InstallerFlags::from_config(&config_with(Settings::default()));

        insta::assert_snapshot!(flags.to_args().join(" "), @"--honour-petsc-dir --install pyadjoint --venv-name firedrake-pragmatic --mpicc /usr/bin/mpicc.mpich --mpicxx /usr/bin/mpicxx.mpich --mpiexec /usr/bin/mpiexec.mpich --mpif90 /usr/bin/mpif90.mpich --package-branch firedrake jwallwork23/pragmatic --disable-ssh --pip-install parameterized");
    }

    #[test]
    fn venv_name_with_spaces_stays_one_argument() {
        let mut settings = Settings::default();
        settings.venv_name = "my env".to_string();
        let args = InstallerFlags::from_config(&config_with(settings)).to_args();

        let idx = args.iter().position(|a| a == "--venv-name").unwrap();
        assert_eq!(args[idx + 1], "my env");
    }

    #[test]
    fn optional_switches_can_be_turned_off() {
        let mut settings = Settings::default();
        settings.installer.honour_petsc_dir = false;
        settings.installer.disable_ssh = false;
        settings.installer.install.clear();
        settings.installer.pip_install = vec!["pytest".to_string(), "parameterized".to_string()];

        let args = InstallerFlags::from_config(&config_with(settings)).to_args();

        assert!(!args.contains(&"--honour-petsc-dir".to_string()));
        assert!(!args.contains(&"--disable-ssh".to_string()));
        assert!(!args.contains(&"--install".to_string()));
        assert_eq!(args.iter().filter(|a| *a == "--pip-install").count(), 2);
        assert_eq!(args.first().map(String::as_str), Some("--venv-name"));
    }

    #[test]
    fn multiple_package_branches() {
        let mut settings = Settings::default();
        settings.installer.package_branches.push(PackageBranch {
            package: "pyadjoint".to_string(),
            branch: "main".to_string(),
        });

        let args = InstallerFlags::from_config(&config_with(settings)).to_args();
        let joined = args.join(" ");
        assert!(joined.contains(
            "--package-branch firedrake jwallwork23/pragmatic --package-branch pyadjoint main"
        ));
    }
}
