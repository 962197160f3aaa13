//! CLI argument definitions for the wavcheck runner.
//!
//! The runner takes single-dash long flags (`-np 4`, `-filter energy`).
//! clap only knows `--long`, so [`normalize_args`] rewrites the single-dash
//! spellings before parsing; the double-dash forms work as well.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags accepted with a single dash.
const SINGLE_DASH_FLAGS: &[&str] = &["config", "np", "log", "filter", "files"];

/// wavcheck - run the audio file check suite
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "wavcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run checks in parallel, using the value as the number of threads
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub np: Option<u32>,

    /// Show available checks without running them
    #[arg(short = 'l')]
    pub list_tests: bool,

    /// Write the check output to this file instead of the terminal
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Run only checks whose names contain one of these keywords
    #[arg(long, num_args = 1..)]
    pub filter: Option<Vec<String>>,

    /// File paths or file path patterns to check instead of the configured ones
    #[arg(long, num_args = 0..)]
    pub files: Option<Vec<String>>,
}

impl Cli {
    /// Parses process arguments, accepting single-dash long flags.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Fallible variant of [`parse_normalized`](Self::parse_normalized) for arbitrary input.
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Rewrites `-np`, `-config`, `-log`, `-filter` and `-files` to their `--` form.
///
/// Everything else, including values, passes through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let rewritten = arg.to_str().and_then(|s| {
                let flag = s.strip_prefix('-')?;
                if flag.starts_with('-') {
                    return None;
                }
                let (name, value) = match flag.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (flag, None),
                };
                if !SINGLE_DASH_FLAGS.contains(&name) {
                    return None;
                }
                Some(match value {
                    Some(value) => format!("--{}={}", name, value),
                    None => format!("--{}", name),
                })
            });
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}
