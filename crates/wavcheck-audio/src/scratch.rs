//! Scratch directory for resampled output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AudioError, AudioResult};

/// Default scratch directory name.
pub const DEFAULT_SCRATCH_DIR: &str = "tmp_1";

/// A scratch directory owned for the lifetime of the guard.
///
/// Acquiring wipes any previous contents and recreates the directory;
/// dropping the guard removes it. Two live guards must not share a path.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    shared_root: Option<PathBuf>,
}

impl ScratchDir {
    /// Remove `path` if it exists, then create it empty.
    pub fn acquire(path: impl Into<PathBuf>) -> AudioResult<Self> {
        let path = path.into();
        let scratch_err = |source| AudioError::Scratch {
            path: path.clone(),
            source,
        };

        if path.exists() {
            fs::remove_dir_all(&path).map_err(scratch_err)?;
        }
        fs::create_dir_all(&path).map_err(scratch_err)?;

        tracing::debug!(path = %path.display(), "acquired scratch directory");
        Ok(Self {
            path,
            shared_root: None,
        })
    }

    /// Acquire `root/name`, a subdirectory of a root shared with other guards.
    ///
    /// The root is removed once the last guard under it is dropped and it is
    /// left empty.
    pub fn acquire_in(root: impl Into<PathBuf>, name: &str) -> AudioResult<Self> {
        let root = root.into();
        let mut scratch = Self::acquire(root.join(name))?;
        scratch.shared_root = Some(root);
        Ok(scratch)
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output path for an FFT resample: `resampled_<stem>_<rate>.wav`.
    pub fn resampled_path(&self, source: &Path, rate: u32) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        self.path.join(format!("resampled_{}_{}.wav", stem, rate))
    }

    /// Output path for an external transcode: `m_<name>`.
    pub fn transcoded_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());
        self.path.join(format!("m_{}", name))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "failed to remove scratch directory");
        }
        // Fails while sibling guards still hold subdirectories
        if let Some(root) = &self.shared_root {
            let _ = fs::remove_dir(root);
        }
    }
}
