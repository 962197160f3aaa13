//! wavcheck check suite
//!
//! This crate holds the checks the `wavcheck` runner executes against a
//! batch of WAV files, plus integration tests for the accessor, the loader
//! and the runner:
//!
//! - Existence and format: non-empty, `.wav` extension, decodes as WAV
//! - Sample rate plausibility
//! - Short-term energy above a threshold
//! - Energy equivalence after FFT or external resampling
//!
//! ## Running the suite
//!
//! ```bash
//! # Through the runner (preferred)
//! wavcheck -np 4 -filter energy -files 'clips/*.wav'
//!
//! # Directly
//! WAVCHECK_ROOT=$PWD cargo test -p wavcheck-tests --test audio_checks -- --nocapture
//! ```

pub mod checks;
pub mod fixtures;
pub mod report;

pub use checks::CheckOutcome;
pub use fixtures::SampleDir;
pub use report::SuiteReport;
