//! Error types for the audio accessor.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio accessor operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Why a `read()` did not produce decoded audio.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source file does not exist.
    #[error("Audio file is not found: {path}")]
    NotFound { path: PathBuf },

    /// The file exists but is not an uncompressed WAV we can decode.
    #[error("Can not read {path} (it is not uncompressed wav format): {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

/// Errors that can occur while working with an audio handle.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Reading the source failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The handle has not been read, or the last read failed.
    #[error("No decoded audio for {path}; call read() and check validity first")]
    NotReady { path: PathBuf },

    /// A sample rate that cannot be used for chunking or resampling.
    #[error("Invalid sample rate: {rate}")]
    InvalidRate { rate: i64 },

    /// Writing a resampled WAV failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Preparing the scratch directory failed.
    #[error("Failed to prepare scratch directory {path}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external transcoder could not be located.
    #[error("External transcoder not found: {executable}")]
    ToolMissing { executable: PathBuf },

    /// The external transcoder could not be started.
    #[error("Failed to spawn {executable}: {source}")]
    ToolSpawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external transcoder exited with a non-zero status.
    #[error("External transcoder exited with status {exit_code}: {stderr}")]
    ToolFailed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The transcoder reported success but produced no file.
    #[error("Expected output file not found: {path}")]
    OutputMissing { path: PathBuf },
}

impl AudioError {
    /// True for failures caused by the external transcoder rather than the audio itself.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            AudioError::ToolMissing { .. }
                | AudioError::ToolSpawn { .. }
                | AudioError::ToolFailed { .. }
                | AudioError::OutputMissing { .. }
        )
    }
}
