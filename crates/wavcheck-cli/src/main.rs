//! wavcheck - command-line wrapper around the audio check suite
//!
//! Builds a `cargo test` invocation for the suite from the flags, runs it,
//! and exits with the suite's exit code.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use wavcheck_cli::{Cli, RunnerConfig, TestRunner};

fn run(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let runner = TestRunner::from_cli(cli, &cwd, RunnerConfig::default())?;

    println!(
        "{} {}",
        "Running test command:".cyan().bold(),
        runner.command_line()
    );
    if let Some(log) = runner.log() {
        println!("  {} {}", "log:".green(), log.display());
    }

    let code = runner.run()?;
    if code != 0 {
        println!("{} exit code {}", "FAILED".red().bold(), code);
    }

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_normalized();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
