//! Launches the check suite as a `cargo test` child process.
//!
//! The wrapper owns no scheduling: parallelism and listing are forwarded to
//! the libtest harness, filter keywords to the suite itself, and the child's
//! exit code is returned unchanged.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use wavcheck_fixtures::{Settings, CONFIG_ENV, FILES_ENV, FILTER_ENV, ROOT_ENV};

use crate::cli_args::Cli;

/// Package holding the check suite.
pub const SUITE_PACKAGE: &str = "wavcheck-tests";
/// Test target the runner executes.
pub const SUITE_TARGET: &str = "audio_checks";

/// Which cargo, manifest and test target to invoke.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub cargo: PathBuf,
    pub manifest_path: PathBuf,
    pub package: String,
    pub test_target: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cargo: std::env::var_os("CARGO")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("cargo")),
            manifest_path: workspace_manifest_path(),
            package: SUITE_PACKAGE.to_string(),
            test_target: SUITE_TARGET.to_string(),
        }
    }
}

/// Path to the workspace Cargo.toml this binary was built from.
pub fn workspace_manifest_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("Cargo.toml")
}

/// Arguments passed after `--` to the libtest harness.
pub fn harness_args(list_only: bool, threads: Option<u32>) -> Vec<String> {
    let mut args = Vec::new();
    if list_only {
        args.push("--list".to_string());
    }
    if let Some(n) = threads {
        args.push("--test-threads".to_string());
        args.push(n.to_string());
    }
    args
}

/// A ready-to-launch suite invocation.
#[derive(Debug, Clone)]
pub struct TestRunner {
    config: RunnerConfig,
    harness_args: Vec<String>,
    env: Vec<(&'static str, OsString)>,
    log: Option<PathBuf>,
}

impl TestRunner {
    /// Creates a runner with no harness arguments, environment or log.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            harness_args: Vec::new(),
            env: Vec::new(),
            log: None,
        }
    }

    /// Builds the invocation for parsed CLI flags.
    ///
    /// Relative `-config`, `-files` and `-log` paths resolve against `cwd`,
    /// since the child runs from the suite's package directory. The config
    /// file is loaded once here so a bad config fails before anything runs.
    pub fn from_cli(cli: &Cli, cwd: &Path, config: RunnerConfig) -> Result<Self> {
        let mut runner = Self::new(config);
        runner.harness_args = harness_args(cli.list_tests, cli.np);
        runner.env.push((ROOT_ENV, cwd.as_os_str().to_os_string()));

        if let Some(config_path) = &cli.config {
            let config_path = cwd.join(config_path);
            Settings::load(&config_path)
                .with_context(|| format!("Invalid config {}", config_path.display()))?;
            runner.env.push((CONFIG_ENV, config_path.into_os_string()));
        }

        if let Some(files) = cli.files.as_ref().filter(|f| !f.is_empty()) {
            let joined = std::env::join_paths(files.iter().map(|f| cwd.join(f)))
                .context("File paths cannot be passed to the check suite")?;
            runner.env.push((FILES_ENV, joined));
        }

        // Keywords match `check[case]` ids, which libtest name filters never see
        if let Some(filter) = cli.filter.as_ref().filter(|f| !f.is_empty()) {
            runner.env.push((FILTER_ENV, filter.join("\n").into()));
        }

        runner.log = cli.log.as_ref().map(|log| cwd.join(log));
        Ok(runner)
    }

    /// Arguments after `--`.
    pub fn harness_args(&self) -> &[String] {
        &self.harness_args
    }

    /// Environment the child receives on top of the parent's.
    pub fn env(&self) -> &[(&'static str, OsString)] {
        &self.env
    }

    /// Log file, if output is redirected.
    pub fn log(&self) -> Option<&Path> {
        self.log.as_deref()
    }

    /// Full argument list, without the cargo executable.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["test".into(), "--manifest-path".into()];
        args.push(self.config.manifest_path.clone().into_os_string());
        args.push("-p".into());
        args.push(self.config.package.clone().into());
        args.push("--test".into());
        args.push(self.config.test_target.clone().into());
        args.push("--".into());
        args.extend(self.harness_args.iter().map(OsString::from));
        args
    }

    /// Printable command line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.config.cargo.as_os_str().to_os_string())
            .chain(self.args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The child command, with streams not yet configured.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.cargo);
        cmd.args(self.args());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Runs the suite and returns its exit code.
    ///
    /// With a log file, the child's stdout and stderr both go to it
    /// (truncated first); otherwise the child inherits this process's
    /// streams. A child killed by a signal reports 1.
    pub fn run(&self) -> Result<i32> {
        let mut cmd = self.command();

        if let Some(log) = &self.log {
            let file = File::create(log)
                .with_context(|| format!("Failed to create log file {}", log.display()))?;
            let stderr = file
                .try_clone()
                .with_context(|| format!("Failed to share log file {}", log.display()))?;
            cmd.stdout(Stdio::from(file));
            cmd.stderr(Stdio::from(stderr));
        }

        tracing::debug!(command = %self.command_line(), "spawning check suite");

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run {}", self.config.cargo.display()))?;

        let code = status.code().unwrap_or(1);
        tracing::debug!(code, "check suite finished");
        Ok(code)
    }
}
