//! wavcheck CLI library.
//!
//! Argument parsing and the suite runner behind the `wavcheck` binary.

pub mod cli_args;
pub mod runner;

pub use cli_args::{normalize_args, Cli};
pub use runner::{harness_args, RunnerConfig, TestRunner};
