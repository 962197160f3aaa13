//! Suite settings.
//!
//! Settings come from an optional TOML file plus environment overrides set
//! by the `wavcheck` runner. Relative paths resolve against [`Settings::root`]:
//! the config file's directory when one is loaded, otherwise `WAVCHECK_ROOT`
//! or the current directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::case::keyword_selects;
use crate::error::{SettingsError, SettingsResult};

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "WAVCHECK_CONFIG";
/// Environment variable holding explicit files/patterns, joined like `PATH`.
pub const FILES_ENV: &str = "WAVCHECK_FILES";
/// Environment variable holding the base directory for relative paths.
pub const ROOT_ENV: &str = "WAVCHECK_ROOT";
/// Environment variable holding case filter keywords, one per line.
pub const FILTER_ENV: &str = "WAVCHECK_FILTER";

/// Settings shared by the loader, the accessor and the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directories whose entries are the sample files.
    pub sample_dirs: Vec<PathBuf>,
    /// Explicit paths or glob patterns; when non-empty, `sample_dirs` is ignored.
    pub files: Vec<String>,
    /// Minimum short-term energy a sample file must exceed.
    pub energy_threshold: f64,
    /// Minimum energy after resampling, carried by every resample case.
    pub resample_threshold: f64,
    /// Chunk duration for short-term energy.
    pub frame_ms: u32,
    /// Lowest plausible sample rate in Hz.
    pub min_sample_rate: u32,
    /// Highest plausible sample rate in Hz.
    pub max_sample_rate: u32,
    /// Maximum relative energy change tolerated after FFT resampling.
    pub max_energy_drift: f64,
    /// Root of the scratch directories.
    pub scratch_dir: PathBuf,
    /// External transcoder executable name or path.
    pub transcoder: PathBuf,
    /// Base directory for relative paths.
    #[serde(skip)]
    pub root: PathBuf,
    /// Keywords selecting cases by id; empty selects every case.
    #[serde(skip)]
    pub filter: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_dirs: vec![
                Path::new("tests").join("sample_data").join("data"),
                Path::new("tests")
                    .join("sample_data")
                    .join("voices")
                    .join("audios"),
            ],
            files: Vec::new(),
            energy_threshold: 0.5,
            resample_threshold: 1.0,
            frame_ms: 20,
            min_sample_rate: 1000,
            max_sample_rate: 384_000,
            max_energy_drift: 0.5,
            scratch_dir: PathBuf::from("tmp_1"),
            transcoder: PathBuf::from("ffmpeg"),
            root: PathBuf::from("."),
            filter: Vec::new(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text. `origin` is only used in errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> SettingsResult<Self> {
        let settings: Settings = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads a TOML config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&content, path)?;
        settings.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(settings)
    }

    /// Builds settings from `WAVCHECK_CONFIG`, `WAVCHECK_ROOT`, `WAVCHECK_FILES`
    /// and `WAVCHECK_FILTER`.
    pub fn from_env() -> SettingsResult<Self> {
        let mut settings = match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path))?,
            _ => {
                let mut settings = Self::default();
                if let Some(root) = env::var_os(ROOT_ENV).filter(|r| !r.is_empty()) {
                    settings.root = PathBuf::from(root);
                }
                settings
            }
        };

        if let Some(files) = env::var_os(FILES_ENV).filter(|f| !f.is_empty()) {
            settings.files = env::split_paths(&files)
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }

        if let Some(filter) = env::var_os(FILTER_ENV) {
            settings.filter = filter
                .to_string_lossy()
                .lines()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }

        tracing::debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Replaces the explicit file list.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the case filter keywords.
    pub fn with_filter<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the case `id` (`check[case]`) is selected by the filter.
    pub fn selects(&self, id: &str) -> bool {
        keyword_selects(&self.filter, id)
    }

    /// Sets the base directory for relative paths.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Resolves `path` against the root unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Scratch root, resolved.
    pub fn scratch_root(&self) -> PathBuf {
        self.resolve(&self.scratch_dir)
    }

    /// Transcoder executable; bare names are left for a PATH lookup.
    pub fn transcoder_path(&self) -> PathBuf {
        if self.transcoder.components().count() > 1 {
            self.resolve(&self.transcoder)
        } else {
            self.transcoder.clone()
        }
    }

    /// Rejects values no check can work with.
    pub fn validate(&self) -> SettingsResult<()> {
        let invalid = |message: String| Err(SettingsError::Invalid { message });

        for (name, value) in [
            ("energy_threshold", self.energy_threshold),
            ("resample_threshold", self.resample_threshold),
            ("max_energy_drift", self.max_energy_drift),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.frame_ms == 0 {
            return invalid("frame_ms must be greater than 0".to_string());
        }
        if self.min_sample_rate > self.max_sample_rate {
            return invalid(format!(
                "min_sample_rate ({}) exceeds max_sample_rate ({})",
                self.min_sample_rate, self.max_sample_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_filter_selects_by_substring() {
        let settings = Settings::default();
        assert!(settings.selects("is_wav_file[data/A.wav]"));

        let settings = settings.with_filter(["b.WAV", "energy_is"]);
        assert!(settings.selects("is_wav_file[data/B.wav]"));
        assert!(settings.selects("energy_is_positive[data/A.wav]"));
        assert!(!settings.selects("is_wav_file[data/A.wav]"));
        assert!(!settings.selects("energy_above_threshold[data/A.wav]"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.energy_threshold, 0.5);
        assert_eq!(settings.resample_threshold, 1.0);
        assert_eq!(settings.min_sample_rate, 1000);
        assert_eq!(settings.scratch_dir, PathBuf::from("tmp_1"));
        assert_eq!(settings.sample_dirs.len(), 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            "energy_threshold = 10.0\nfiles = [\"a.wav\"]\n",
            Path::new("wavcheck.toml"),
        )
        .unwrap();
        assert_eq!(settings.energy_threshold, 10.0);
        assert_eq!(settings.files, vec!["a.wav".to_string()]);
        assert_eq!(settings.frame_ms, 20);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::from_toml_str("treshold = 1\n", Path::new("wavcheck.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for content in [
            "frame_ms = 0",
            "energy_threshold = -1.0",
            "min_sample_rate = 48000\nmax_sample_rate = 8000",
        ] {
            let err = Settings::from_toml_str(content, Path::new("wavcheck.toml")).unwrap_err();
            assert!(matches!(err, SettingsError::Invalid { .. }), "{}", content);
        }
    }

    #[test]
    fn test_load_sets_root_to_config_dir() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("wavcheck.toml");
        fs::write(&config, "scratch_dir = \"scratch\"\n").unwrap();

        let settings = Settings::load(&config).unwrap();
        assert_eq!(settings.root, dir.path());
        assert_eq!(settings.scratch_root(), dir.path().join("scratch"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_transcoder_path() {
        let settings = Settings::default().with_root("/work");
        assert_eq!(settings.transcoder_path(), PathBuf::from("ffmpeg"));

        let settings = Settings {
            transcoder: PathBuf::from("bin/ffmpeg"),
            ..settings
        };
        assert_eq!(settings.transcoder_path(), PathBuf::from("/work/bin/ffmpeg"));
    }
}
