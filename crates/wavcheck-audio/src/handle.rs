//! The audio accessor.

use std::path::{Path, PathBuf};

use hound::SampleFormat;

use crate::energy::{chunk_frames, short_term_energy};
use crate::error::{AudioError, AudioResult, ReadError};
use crate::resample::{resample_interleaved, target_len};
use crate::scratch::ScratchDir;
use crate::transcoder::Transcoder;
use crate::wav::{self, DecodedAudio};

/// Rate reported by a handle that has not been read successfully.
pub const UNREAD_RATE: i64 = -1;

/// Default chunk duration for short-term energy, in milliseconds.
pub const DEFAULT_FRAME_MS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Validity {
    Unopened,
    Valid,
    Invalid,
}

/// A handle on one WAV file.
///
/// Construction only records the path. `read()` decodes the file and marks
/// the handle valid or invalid; resampling writes a new file under a
/// [`ScratchDir`] and points the handle at it, after which `read()` must be
/// called again to load the new data.
///
/// # Example
///
/// ```rust,ignore
/// let mut audio = AudioHandle::new("file.wav");
/// if audio.read().is_ok() {
///     println!("energy = {}", audio.compute_energy());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AudioHandle {
    path: PathBuf,
    frame_ms: u32,
    validity: Validity,
    audio: Option<DecodedAudio>,
}

impl AudioHandle {
    /// Creates an unopened handle with the default chunk duration.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_frame_ms(path, DEFAULT_FRAME_MS)
    }

    /// Creates an unopened handle with a custom chunk duration.
    pub fn with_frame_ms(path: impl Into<PathBuf>, frame_ms: u32) -> Self {
        Self {
            path: path.into(),
            frame_ms: frame_ms.max(1),
            validity: Validity::Unopened,
            audio: None,
        }
    }

    /// The active file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chunk duration in milliseconds.
    pub fn frame_ms(&self) -> u32 {
        self.frame_ms
    }

    /// Decodes the active file.
    ///
    /// On failure the handle is marked invalid, its rate becomes -1 and its
    /// data is empty; nothing panics.
    pub fn read(&mut self) -> Result<&DecodedAudio, ReadError> {
        match wav::decode(&self.path) {
            Ok(decoded) => {
                tracing::debug!(
                    path = %self.path.display(),
                    rate = decoded.sample_rate(),
                    channels = decoded.channels(),
                    frames = decoded.frame_count(),
                    "decoded wav"
                );
                self.validity = Validity::Valid;
                Ok(self.audio.insert(decoded))
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.validity = Validity::Invalid;
                self.audio = None;
                Err(e)
            }
        }
    }

    /// True when the last `read()` decoded a supported format.
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }

    /// Alias for [`is_valid`](Self::is_valid).
    pub fn is_wav(&self) -> bool {
        self.is_valid()
    }

    /// True until `read()` has been called.
    pub fn is_unopened(&self) -> bool {
        self.validity == Validity::Unopened
    }

    /// Decoded audio, if the handle is valid.
    pub fn audio(&self) -> Option<&DecodedAudio> {
        self.audio.as_ref()
    }

    /// Sample rate in Hz, or -1 when unread or invalid.
    pub fn rate(&self) -> i64 {
        self.audio
            .as_ref()
            .map_or(UNREAD_RATE, |a| i64::from(a.sample_rate()))
    }

    /// Sample rate when valid.
    pub fn sample_rate(&self) -> Option<u32> {
        self.audio.as_ref().map(DecodedAudio::sample_rate)
    }

    /// Interleaved samples; empty when unread or invalid.
    pub fn samples(&self) -> &[f64] {
        self.audio.as_ref().map_or(&[][..], |a| a.samples.as_slice())
    }

    /// Channel count, 0 when unread or invalid.
    pub fn channels(&self) -> u16 {
        self.audio.as_ref().map_or(0, DecodedAudio::channels)
    }

    /// Frames per channel.
    pub fn frame_count(&self) -> usize {
        self.audio.as_ref().map_or(0, DecodedAudio::frame_count)
    }

    /// Sample encoding of the decoded file.
    pub fn sample_format(&self) -> Option<SampleFormat> {
        self.audio.as_ref().map(|a| a.spec.sample_format)
    }

    /// Duration in seconds, 0.0 when unread or invalid.
    pub fn length_secs(&self) -> f64 {
        match self.sample_rate() {
            Some(rate) if rate > 0 => self.frame_count() as f64 / rate as f64,
            _ => 0.0,
        }
    }

    /// Short-term energy summed over all chunks.
    ///
    /// Returns 0.0 for an unread or invalid handle and for empty data.
    pub fn compute_energy(&self) -> f64 {
        match &self.audio {
            Some(audio) if audio.sample_rate() > 0 => short_term_energy(
                &audio.samples,
                audio.channels(),
                chunk_frames(audio.sample_rate(), self.frame_ms),
            ),
            _ => 0.0,
        }
    }

    /// Like [`compute_energy`](Self::compute_energy), but an unread or
    /// invalid handle is an error instead of zero.
    pub fn checked_energy(&self) -> AudioResult<f64> {
        let audio = self.ready()?;
        if audio.sample_rate() == 0 {
            return Err(AudioError::InvalidRate { rate: 0 });
        }
        Ok(self.compute_energy())
    }

    /// Resamples with the FFT resampler and writes the result under `scratch`.
    ///
    /// The sample count becomes `round(frames * target_rate / rate)`. On a
    /// successful write the handle's path switches to the new file, which is
    /// returned. The in-memory data is left as it was until the next `read()`.
    pub fn resampling(&mut self, target_rate: u32, scratch: &ScratchDir) -> AudioResult<PathBuf> {
        let audio = self.ready()?;
        if target_rate == 0 || audio.sample_rate() == 0 {
            return Err(AudioError::InvalidRate {
                rate: i64::from(target_rate.min(audio.sample_rate())),
            });
        }

        let num = target_len(audio.frame_count(), audio.sample_rate(), target_rate);
        let resampled = resample_interleaved(&audio.samples, audio.channels(), num);

        let mut spec = audio.spec;
        spec.sample_rate = target_rate;

        let output = scratch.resampled_path(&self.path, target_rate);
        wav::encode(&output, spec, &resampled)?;

        tracing::debug!(
            from = %self.path.display(),
            to = %output.display(),
            rate = target_rate,
            frames = num,
            "resampled"
        );
        self.path = output.clone();
        Ok(output)
    }

    /// Resamples by running the external transcoder.
    ///
    /// On success the handle's path switches to the transcoded file. On
    /// failure the diagnostics are logged, the path is left unchanged and
    /// the external failure is returned.
    pub fn resampling_by_external_tool(
        &mut self,
        target_rate: u32,
        transcoder: &Transcoder,
        scratch: &ScratchDir,
    ) -> AudioResult<PathBuf> {
        let output = scratch.transcoded_path(&self.path);

        match transcoder.transcode(&self.path, target_rate, &output) {
            Ok(run) => {
                tracing::debug!(exit_code = run.exit_code, stderr = %run.stderr, "transcoder finished");
                self.path = output.clone();
                Ok(output)
            }
            Err(e) => {
                match &e {
                    AudioError::ToolFailed {
                        exit_code,
                        stdout,
                        stderr,
                    } => tracing::warn!(
                        exit_code,
                        stdout = %stdout,
                        stderr = %stderr,
                        "transcoder failed for {}",
                        self.path.display()
                    ),
                    other => tracing::warn!("{}", other),
                }
                Err(e)
            }
        }
    }

    fn ready(&self) -> AudioResult<&DecodedAudio> {
        match (&self.audio, self.validity) {
            (Some(audio), Validity::Valid) => Ok(audio),
            _ => Err(AudioError::NotReady {
                path: self.path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavSpec;
    use tempfile::TempDir;

    fn write_tone(path: &Path, rate: u32, frames: usize) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let samples: Vec<f64> = (0..frames)
            .map(|i| {
                let t = i as f64 / rate as f64;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 8000.0
            })
            .collect();
        wav::encode(path, spec, &samples).unwrap();
    }

    #[test]
    fn test_unopened_handle() {
        let audio = AudioHandle::new("A.wav");
        assert!(audio.is_unopened());
        assert!(!audio.is_valid());
        assert_eq!(audio.rate(), UNREAD_RATE);
        assert_eq!(audio.compute_energy(), 0.0);
        assert!(matches!(
            audio.checked_energy(),
            Err(AudioError::NotReady { .. })
        ));
    }

    #[test]
    fn test_read_populates_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 16000, 8000);

        let mut audio = AudioHandle::new(&path);
        audio.read().unwrap();

        assert!(audio.is_valid());
        assert_eq!(audio.rate(), 16000);
        assert_eq!(audio.channels(), 1);
        assert_eq!(audio.frame_count(), 8000);
        assert!((audio.length_secs() - 0.5).abs() < 1e-12);
        assert_eq!(audio.sample_format(), Some(SampleFormat::Int));
        assert!(audio.compute_energy() > 0.0);
    }

    #[test]
    fn test_failed_read_after_valid_read_invalidates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 8000, 800);

        let mut audio = AudioHandle::new(&path);
        audio.read().unwrap();
        std::fs::write(&path, b"no longer a wav").unwrap();

        assert!(audio.read().is_err());
        assert!(!audio.is_valid());
        assert_eq!(audio.rate(), UNREAD_RATE);
        assert!(audio.samples().is_empty());
    }

    #[test]
    fn test_resampling_requires_read() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::acquire(dir.path().join("scratch")).unwrap();
        let mut audio = AudioHandle::new(dir.path().join("A.wav"));
        assert!(matches!(
            audio.resampling(8000, &scratch),
            Err(AudioError::NotReady { .. })
        ));
    }

    #[test]
    fn test_resampling_rejects_zero_rate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 8000, 800);
        let scratch = ScratchDir::acquire(dir.path().join("scratch")).unwrap();

        let mut audio = AudioHandle::new(&path);
        audio.read().unwrap();
        assert!(matches!(
            audio.resampling(0, &scratch),
            Err(AudioError::InvalidRate { rate: 0 })
        ));
        assert_eq!(audio.path(), path.as_path());
    }
}
