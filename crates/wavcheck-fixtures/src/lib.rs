//! wavcheck settings and fixture loading
//!
//! Loads [`Settings`] from TOML and the environment, discovers sample files
//! and builds the parametrization lists the checks run over: a plain file
//! list, and the `files × {+, -}` product of [`ResampleCase`]s.
//!
//! Discovery runs fully on every call; nothing is cached.

pub mod case;
pub mod discovery;
pub mod error;
pub mod settings;

pub use case::{keyword_selects, resample_cases, Direction, ResampleCase};
pub use discovery::{discover_files, Fixtures};
pub use error::{SettingsError, SettingsResult};
pub use settings::{Settings, CONFIG_ENV, FILES_ENV, FILTER_ENV, ROOT_ENV};
