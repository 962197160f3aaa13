//! Sample file discovery.

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};

use crate::case::{resample_cases, ResampleCase};
use crate::error::{SettingsError, SettingsResult};
use crate::settings::Settings;

/// Discovered sample files and the cases built from them.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    files: Vec<PathBuf>,
    resample_cases: Vec<ResampleCase>,
}

impl Fixtures {
    /// Discovers files per `settings` and builds the parametrization lists.
    pub fn discover(settings: &Settings) -> SettingsResult<Self> {
        let files = discover_files(settings)?;
        let resample_cases = resample_cases(&files, settings.resample_threshold);
        tracing::debug!(
            files = files.len(),
            resample_cases = resample_cases.len(),
            "discovered fixtures"
        );
        Ok(Self {
            files,
            resample_cases,
        })
    }

    /// Files for the existence and format checks.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// (file, threshold, direction) cases for the resample checks.
    pub fn resample_cases(&self) -> &[ResampleCase] {
        &self.resample_cases
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lists sample files.
///
/// With explicit `files`, each entry is expanded as a glob pattern; an entry
/// without wildcards is kept as-is even if missing, so the checks report it.
/// Otherwise every regular file directly inside each sample directory is
/// listed, sorted per directory. Wildcards never match hidden files.
pub fn discover_files(settings: &Settings) -> SettingsResult<Vec<PathBuf>> {
    if !settings.files.is_empty() {
        let mut files = Vec::new();
        for entry in &settings.files {
            let resolved = settings.resolve(Path::new(entry));
            if has_wildcards(entry) {
                files.extend(expand_pattern(&resolved.to_string_lossy())?);
            } else {
                files.push(resolved);
            }
        }
        return Ok(files);
    }

    let mut files = Vec::new();
    for dir in &settings.sample_dirs {
        let dir = settings.resolve(dir);
        let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
        files.extend(expand_pattern(&pattern)?);
    }
    Ok(files)
}

fn has_wildcards(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn expand_pattern(pattern: &str) -> SettingsResult<Vec<PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let paths = glob_with(pattern, options).map_err(|source| SettingsError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"RIFF").unwrap();
    }

    #[test]
    fn test_discover_sample_dirs() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("tests/sample_data/data");
        let voices = root.path().join("tests/sample_data/voices/audios");
        touch(&data.join("b.wav"));
        touch(&data.join("a.wav"));
        touch(&voices.join("v.txt"));
        fs::create_dir_all(data.join("nested")).unwrap();

        let settings = Settings::default().with_root(root.path());
        let files = discover_files(&settings).unwrap();

        assert_eq!(
            files,
            vec![data.join("a.wav"), data.join("b.wav"), voices.join("v.txt")]
        );
    }

    #[test]
    fn test_hidden_files_are_not_discovered() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("tests/sample_data/data");
        touch(&data.join("a.wav"));
        touch(&data.join(".DS_Store"));
        touch(&root.path().join("clips/.gitkeep"));
        touch(&root.path().join("clips/one.wav"));

        let settings = Settings::default().with_root(root.path());
        assert_eq!(discover_files(&settings).unwrap(), vec![data.join("a.wav")]);

        let settings = settings.with_files(["clips/*"]);
        assert_eq!(
            discover_files(&settings).unwrap(),
            vec![root.path().join("clips/one.wav")]
        );
    }

    #[test]
    fn test_missing_sample_dirs_yield_nothing() {
        let root = TempDir::new().unwrap();
        let settings = Settings::default().with_root(root.path());
        let fixtures = Fixtures::discover(&settings).unwrap();
        assert!(fixtures.is_empty());
        assert!(fixtures.resample_cases().is_empty());
    }

    #[test]
    fn test_explicit_files_override_dirs() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("tests/sample_data/data/ignored.wav"));
        touch(&root.path().join("clips/one.wav"));
        touch(&root.path().join("clips/two.wav"));
        touch(&root.path().join("clips/notes.txt"));

        let settings = Settings::default()
            .with_root(root.path())
            .with_files(["clips/*.wav", "missing.wav"]);
        let files = discover_files(&settings).unwrap();

        assert_eq!(
            files,
            vec![
                root.path().join("clips/one.wav"),
                root.path().join("clips/two.wav"),
                root.path().join("missing.wav"),
            ]
        );
    }

    #[test]
    fn test_fixtures_build_resample_product() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("tests/sample_data/data/a.wav"));

        let settings = Settings::default().with_root(root.path());
        let fixtures = Fixtures::discover(&settings).unwrap();

        assert_eq!(fixtures.files().len(), 1);
        assert_eq!(fixtures.resample_cases().len(), 2);
        assert_eq!(fixtures.resample_cases()[0].threshold, 1.0);
    }

    #[test]
    fn test_bad_pattern() {
        let settings = Settings::default().with_files(["clips/[*.wav"]);
        let err = discover_files(&settings).unwrap_err();
        assert!(matches!(err, SettingsError::Pattern { .. }));
    }
}
