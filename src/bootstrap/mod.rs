//! Step orchestration.
//!
//! A run is a fixed, linear sequence with no retries:
//!
//! 1. validate prerequisites
//! 2. report the configuration
//! 3. wait for the operator
//! 4. fetch the installer
//! 5. run the installer
//! 6. activate the virtual environment
//! 7. run the smoke test
//!
//! The first failure ends the run.

pub mod report;

pub use report::{active_interpreter, report_configuration, report_lines, NOT_FOUND};

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::installer::{prepare_installer, run_installer, Installer, InstallerInvocation};
use crate::requirements::validate_prerequisites;
use crate::smoke::{run_smoke_test, SmokeRunner, SmokeTest};
use crate::ui::{Confirmation, UserInterface};
use crate::venv::ActivatedEnvironment;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Prompt shown at the confirmation gate.
pub use crate::ui::confirm::GATE_PROMPT;

/// Number of steps in a full run.
pub const TOTAL_STEPS: usize = 7;

/// Options for a bootstrap run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print what would happen after the gate instead of doing it.
    pub dry_run: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The virtual environment that was (or would be) created.
    pub install_dir: PathBuf,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Wall-clock time for the whole run.
    pub duration: Duration,
}

/// Runs the bootstrap sequence for one configuration.
pub struct Bootstrapper<'a> {
    config: &'a BootstrapConfig,
    options: RunOptions,
}

impl<'a> Bootstrapper<'a> {
    /// Create a bootstrapper for `config`.
    pub fn new(config: &'a BootstrapConfig, options: RunOptions) -> Self {
        Self { config, options }
    }

    /// Validate and report only. Used by `check`.
    pub fn check(&self, ui: &mut dyn UserInterface) -> Result<()> {
        validate_prerequisites(self.config)?;
        report_configuration(self.config, ui);
        Ok(())
    }

    /// Run every step in order.
    pub fn run(
        &self,
        ui: &mut dyn UserInterface,
        gate: &mut dyn Confirmation,
        installer: &mut dyn Installer,
        smoke: &mut dyn SmokeRunner,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let config = self.config;

        ui.show_header(&format!("Bootstrapping Firedrake into {}", config.install_dir.display()));
        if self.options.dry_run {
            ui.message("Running in dry-run mode - nothing will be downloaded or installed");
        }

        ui.show_step(1, TOTAL_STEPS, "Checking prerequisites");
        validate_prerequisites(config)?;

        ui.show_step(2, TOTAL_STEPS, "Configuration");
        report_configuration(config, ui);

        ui.show_step(3, TOTAL_STEPS, "Waiting for confirmation");
        if !gate.confirm(GATE_PROMPT)? {
            tracing::info!("Operator declined at the gate");
            return Err(BootstrapError::Aborted);
        }

        if self.options.dry_run {
            self.describe(ui);
            return Ok(self.summary(start));
        }

        ui.show_step(4, TOTAL_STEPS, "Fetching installer");
        let script = prepare_installer(config, ui)?;

        ui.show_step(5, TOTAL_STEPS, "Running firedrake-install");
        let invocation = InstallerInvocation::new(config, script);
        run_installer(installer, &invocation)?;
        ui.success("firedrake-install completed");

        ui.show_step(6, TOTAL_STEPS, "Activating virtual environment");
        let venv = ActivatedEnvironment::activate(config)?;
        ui.message(&format!("Activated {}", venv.root().display()));

        ui.show_step(7, TOTAL_STEPS, "Running smoke test");
        let test = SmokeTest::from_config(config);
        run_smoke_test(smoke, &test, &venv)?;
        ui.success(&format!("{} passed", test.script));

        let summary = self.summary(start);
        tracing::info!("Bootstrap finished in {:?}", summary.duration);
        Ok(summary)
    }

    /// Print the remaining steps without running them.
    fn describe(&self, ui: &mut dyn UserInterface) {
        let config = self.config;
        let script = config.installer_script();

        match &config.installer_path {
            Some(path) => ui.message(&format!("Would use installer {}", path.display())),
            None => ui.message(&format!(
                "Would download {} to {}",
                config.installer.url,
                script.display()
            )),
        }

        let invocation = InstallerInvocation::new(config, script);
        ui.message(&format!(
            "Would run in {}: {}",
            invocation.cwd.display(),
            invocation.display()
        ));
        ui.message(&format!(
            "Would activate {}",
            config.install_dir.display()
        ));

        let test = SmokeTest::from_config(config);
        ui.message(&format!(
            "Would run in {}: {}",
            test.dir.display(),
            test.display()
        ));
    }

    fn summary(&self, start: Instant) -> RunSummary {
        RunSummary {
            install_dir: self.config.install_dir.clone(),
            dry_run: self.options.dry_run,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, Settings};
    use crate::shell::CommandResult;
    use crate::ui::MockUI;
    use std::env::VarError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A fake toolchain, PETSc tree and local installer under one temp dir.
    struct Fixture {
        _temp: TempDir,
        config: BootstrapConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path();
            let bin = root.join("mpi");
            fs::create_dir_all(&bin).unwrap();
            for tool in ["mpicc", "mpicxx", "mpiexec", "mpif90"] {
                fs::write(bin.join(tool), "").unwrap();
            }
            fs::create_dir_all(root.join("petsc")).unwrap();
            fs::create_dir_all(root.join("software")).unwrap();
            let installer = root.join("firedrake-install");
            fs::write(&installer, "").unwrap();

            let overrides = ConfigOverrides {
                mpicc: Some(bin.join("mpicc")),
                mpicxx: Some(bin.join("mpicxx")),
                mpiexec: Some(bin.join("mpiexec")),
                mpif90: Some(bin.join("mpif90")),
                petsc_dir: Some(root.join("petsc")),
                petsc_arch: Some("arch-linux-c-opt".to_string()),
                software_dir: Some(root.join("software")),
                installer_path: Some(installer),
                ..Default::default()
            };
            let config = BootstrapConfig::resolve_with_env(
                Settings::default(),
                &overrides,
                |_: &str| Err(VarError::NotPresent),
            )
            .unwrap();

            Self {
                _temp: temp,
                config,
            }
        }
    }

    fn status(code: i32) -> CommandResult {
        CommandResult {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: code == 0,
        }
    }

    /// Installer stand-in that lays down a venv on success.
    struct FakeInstaller {
        exit_code: i32,
        invocations: Vec<Vec<String>>,
    }

    impl FakeInstaller {
        fn exiting(exit_code: i32) -> Self {
            Self {
                exit_code,
                invocations: vec![],
            }
        }
    }

    impl Installer for FakeInstaller {
        fn run(&mut self, invocation: &InstallerInvocation) -> Result<CommandResult> {
            self.invocations.push(invocation.args());
            if self.exit_code == 0 {
                let venv = invocation.cwd.join(&invocation.flags.venv_name);
                fs::create_dir_all(venv.join("bin")).unwrap();
                fs::write(venv.join("bin/activate"), "").unwrap();
                fs::create_dir_all(venv.join("src/firedrake/tests/regression")).unwrap();
            }
            Ok(status(self.exit_code))
        }
    }

    struct FakeSmoke {
        exit_code: i32,
        ran_in: Option<PathBuf>,
        virtual_env: Option<String>,
    }

    impl FakeSmoke {
        fn exiting(exit_code: i32) -> Self {
            Self {
                exit_code,
                ran_in: None,
                virtual_env: None,
            }
        }
    }

    impl SmokeRunner for FakeSmoke {
        fn run(&mut self, test: &SmokeTest, venv: &ActivatedEnvironment) -> Result<CommandResult> {
            self.ran_in = Some(test.dir.clone());
            self.virtual_env = venv.env().set.get("VIRTUAL_ENV").cloned();
            Ok(status(self.exit_code))
        }
    }

    #[test]
    fn full_run_succeeds() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();
        let mut installer = FakeInstaller::exiting(0);
        let mut smoke = FakeSmoke::exiting(0);
        let gate = &mut MockUI::new();

        let summary = Bootstrapper::new(&fixture.config, RunOptions::default())
            .run(&mut ui, gate, &mut installer, &mut smoke)
            .unwrap();

        assert!(!summary.dry_run);
        assert_eq!(summary.install_dir, fixture.config.install_dir);
        assert_eq!(ui.steps().len(), TOTAL_STEPS);
        assert_eq!(
            ui.headers(),
            [format!(
                "Bootstrapping Firedrake into {}",
                fixture.config.install_dir.display()
            )]
        );
        assert!(ui.has_success("test_adapt_pragmatic.py passed"));

        let args = &installer.invocations[0];
        let idx = args.iter().position(|a| a == "--venv-name").unwrap();
        assert_eq!(args[idx + 1], "firedrake-pragmatic");

        assert!(smoke
            .ran_in
            .unwrap()
            .ends_with("firedrake-pragmatic/src/firedrake/tests/regression"));
        assert_eq!(
            smoke.virtual_env.map(PathBuf::from),
            Some(fixture.config.install_dir.clone())
        );
    }

    #[test]
    fn each_missing_tool_stops_before_installer() {
        for name in ["MPICC", "MPICXX", "MPIEXEC", "MPIF90"] {
            let fixture = Fixture::new();
            let missing = fixture
                .config
                .mpi
                .tools()
                .iter()
                .find(|(tool, _)| *tool == name)
                .map(|(_, path)| path.to_path_buf())
                .unwrap();
            fs::remove_file(&missing).unwrap();

            let mut ui = MockUI::new();
            let mut gate = MockUI::new();
            let mut installer = FakeInstaller::exiting(0);

            let err = Bootstrapper::new(&fixture.config, RunOptions::default())
                .run(&mut ui, &mut gate, &mut installer, &mut FakeSmoke::exiting(0))
                .unwrap_err();

            match err {
                BootstrapError::MissingPath { name: reported, path } => {
                    assert_eq!(reported, name);
                    assert_eq!(path, missing);
                }
                other => panic!("expected MissingPath for {}, got {:?}", name, other),
            }
            assert!(installer.invocations.is_empty(), "{} ran the installer", name);
            assert!(gate.confirmations().is_empty());
            assert!(ui.messages().is_empty());
        }
    }

    #[test]
    fn nonexistent_petsc_dir_stops_before_installer() {
        let mut fixture = Fixture::new();
        fixture.config.petsc_dir = PathBuf::from("/nonexistent/petsc");
        let mut installer = FakeInstaller::exiting(0);

        let err = Bootstrapper::new(&fixture.config, RunOptions::default())
            .run(
                &mut MockUI::new(),
                &mut MockUI::new(),
                &mut installer,
                &mut FakeSmoke::exiting(0),
            )
            .unwrap_err();

        match err {
            BootstrapError::MissingPath { name, path } => {
                assert_eq!(name, "PETSC_DIR");
                assert_eq!(path, Path::new("/nonexistent/petsc"));
            }
            other => panic!("expected MissingPath, got {:?}", other),
        }
        assert!(installer.invocations.is_empty());
    }

    #[test]
    fn declining_the_gate_aborts() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();
        let mut gate = MockUI::new();
        gate.set_confirm_response(false);
        let mut installer = FakeInstaller::exiting(0);

        let err = Bootstrapper::new(&fixture.config, RunOptions::default())
            .run(&mut ui, &mut gate, &mut installer, &mut FakeSmoke::exiting(0))
            .unwrap_err();

        assert!(matches!(err, BootstrapError::Aborted));
        assert_eq!(gate.confirmations(), [GATE_PROMPT]);
        assert!(installer.invocations.is_empty());
        assert_eq!(ui.messages().len(), 9);
    }

    #[test]
    fn installer_failure_skips_activation_and_smoke_test() {
        let fixture = Fixture::new();
        let mut smoke = FakeSmoke::exiting(0);

        let err = Bootstrapper::new(&fixture.config, RunOptions::default())
            .run(
                &mut MockUI::new(),
                &mut MockUI::new(),
                &mut FakeInstaller::exiting(2),
                &mut smoke,
            )
            .unwrap_err();

        assert!(matches!(err, BootstrapError::InstallerFailed { code: Some(2) }));
        assert!(smoke.ran_in.is_none());
    }

    #[test]
    fn smoke_test_failure_fails_the_run() {
        let fixture = Fixture::new();

        let err = Bootstrapper::new(&fixture.config, RunOptions::default())
            .run(
                &mut MockUI::new(),
                &mut MockUI::new(),
                &mut FakeInstaller::exiting(0),
                &mut FakeSmoke::exiting(1),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::SmokeTestFailed { code: Some(1), .. }
        ));
    }

    #[test]
    fn dry_run_stops_after_the_gate() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();
        let mut installer = FakeInstaller::exiting(0);
        let mut smoke = FakeSmoke::exiting(0);

        let summary = Bootstrapper::new(&fixture.config, RunOptions { dry_run: true })
            .run(&mut ui, &mut MockUI::new(), &mut installer, &mut smoke)
            .unwrap();

        assert!(summary.dry_run);
        assert!(installer.invocations.is_empty());
        assert!(smoke.ran_in.is_none());
        assert!(ui.has_message("Would use installer"));
        assert!(ui.has_message("--venv-name firedrake-pragmatic"));
        assert!(ui.has_message("Would run in"));
        assert!(!fixture.config.install_dir.exists());
    }

    #[test]
    fn check_validates_and_reports() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();

        Bootstrapper::new(&fixture.config, RunOptions::default())
            .check(&mut ui)
            .unwrap();

        assert_eq!(ui.messages().len(), 9);
        assert!(ui.confirmations().is_empty());
    }
}
