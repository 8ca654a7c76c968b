//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Bootstrap a Firedrake installation with Pragmatic mesh adaptation on top
/// of an existing PETSc build.
#[derive(Debug, Parser)]
#[command(name = "firedrake-bootstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (default: ./firedrake-bootstrap.yml if present)
    #[arg(short, long, global = true, env = "FIREDRAKE_BOOTSTRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output, including where each value came from
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install Firedrake and run the smoke test (default if no command specified)
    Run(RunArgs),

    /// Check prerequisites and print the configuration report
    Check(CheckArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Values that override the settings file and environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct OverrideArgs {
    /// Name of the virtual environment to create
    #[arg(long, value_name = "NAME")]
    pub venv_name: Option<String>,

    /// MPI C compiler
    #[arg(long, value_name = "PATH")]
    pub mpicc: Option<PathBuf>,

    /// MPI C++ compiler
    #[arg(long, value_name = "PATH")]
    pub mpicxx: Option<PathBuf>,

    /// MPI launcher
    #[arg(long, value_name = "PATH")]
    pub mpiexec: Option<PathBuf>,

    /// MPI Fortran compiler
    #[arg(long, value_name = "PATH")]
    pub mpif90: Option<PathBuf>,

    /// Base software directory [default: $SOFTWARE]
    #[arg(long, value_name = "DIR")]
    pub software_dir: Option<PathBuf>,

    /// PETSc installation [default: $PETSC_DIR]
    #[arg(long, value_name = "DIR")]
    pub petsc_dir: Option<PathBuf>,

    /// PETSc build architecture [default: $PETSC_ARCH]
    #[arg(long, value_name = "ARCH")]
    pub petsc_arch: Option<String>,
}

impl OverrideArgs {
    /// Convert to configuration overrides.
    pub fn to_overrides(&self, installer_path: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            mpicc: self.mpicc.clone(),
            mpicxx: self.mpicxx.clone(),
            mpiexec: self.mpiexec.clone(),
            mpif90: self.mpif90.clone(),
            venv_name: self.venv_name.clone(),
            software_dir: self.software_dir.clone(),
            petsc_dir: self.petsc_dir.clone(),
            petsc_arch: self.petsc_arch.clone(),
            installer_path,
        }
    }
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Skip the confirmation pause
    #[arg(short, long)]
    pub yes: bool,

    /// Preview the installer and smoke test without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Use a local installer script instead of downloading one
    #[arg(long, value_name = "FILE")]
    pub installer_path: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
