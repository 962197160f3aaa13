//! External command-line transcoder (ffmpeg-compatible).

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{AudioError, AudioResult};

/// Default transcoder executable.
pub const DEFAULT_TRANSCODER: &str = "ffmpeg";

/// Captured output of a successful transcoder run.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `<executable> -i <in> -ar <rate> <out>`.
#[derive(Debug, Clone)]
pub struct Transcoder {
    executable: PathBuf,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCODER)
    }
}

impl Transcoder {
    /// Creates a transcoder for the given executable name or path.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The configured executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Resolves the executable, either as an existing path or through PATH.
    pub fn locate(&self) -> AudioResult<PathBuf> {
        if self.executable.components().count() > 1 {
            if self.executable.is_file() {
                return Ok(self.executable.clone());
            }
        } else if let Ok(path) = which::which(&self.executable) {
            return Ok(path);
        }

        Err(AudioError::ToolMissing {
            executable: self.executable.clone(),
        })
    }

    /// True when the executable can be found.
    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    /// Converts `input` to `rate` Hz, writing `output`.
    ///
    /// An existing `output` is removed first so the tool never prompts.
    /// Blocks until the tool exits.
    pub fn transcode(&self, input: &Path, rate: u32, output: &Path) -> AudioResult<TranscodeOutput> {
        let executable = self.locate()?;

        if output.exists() {
            std::fs::remove_file(output).map_err(|source| AudioError::Scratch {
                path: output.to_path_buf(),
                source,
            })?;
        }

        let mut cmd = Command::new(&executable);
        cmd.arg("-i")
            .arg(input)
            .arg("-ar")
            .arg(rate.to_string())
            .arg(output);
        cmd.stdin(Stdio::null());

        tracing::debug!(command = ?cmd, "running transcoder");

        let result = cmd.output().map_err(|source| AudioError::ToolSpawn {
            executable: executable.clone(),
            source,
        })?;

        let exit_code = result.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&result.stdout).to_string();
        let stderr = String::from_utf8_lossy(&result.stderr).to_string();

        if !result.status.success() {
            return Err(AudioError::ToolFailed {
                exit_code,
                stdout,
                stderr,
            });
        }

        if !output.is_file() {
            return Err(AudioError::OutputMissing {
                path: output.to_path_buf(),
            });
        }

        Ok(TranscodeOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_is_tool_missing() {
        let dir = TempDir::new().unwrap();
        let transcoder = Transcoder::new(dir.path().join("no-such-transcoder"));
        assert!(matches!(
            transcoder.locate(),
            Err(AudioError::ToolMissing { .. })
        ));
        assert!(!transcoder.is_available());
    }

    #[test]
    fn test_missing_name_is_tool_missing() {
        let transcoder = Transcoder::new("wavcheck-definitely-not-installed");
        let dir = TempDir::new().unwrap();
        let err = transcoder
            .transcode(
                &dir.path().join("in.wav"),
                16000,
                &dir.path().join("out.wav"),
            )
            .unwrap_err();
        assert!(err.is_external());
    }

    #[test]
    fn test_default_is_ffmpeg() {
        assert_eq!(Transcoder::default().executable(), Path::new("ffmpeg"));
    }
}
