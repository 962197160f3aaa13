//! Test fixture utilities for building sample directories of WAV files.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

/// Peak amplitude used for generated 16-bit tones.
pub const TONE_AMPLITUDE: f64 = 8000.0;

/// A temporary directory laid out like a sample data root.
pub struct SampleDir {
    pub root: TempDir,
    pub data_dir: PathBuf,
}

impl SampleDir {
    /// Create an empty sample root with `tests/sample_data/data`.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let data_dir = root.path().join("tests").join("sample_data").join("data");
        fs::create_dir_all(&data_dir).expect("Failed to create sample data dir");
        Self { root, data_dir }
    }

    /// Root path (what settings resolve against).
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add a 16-bit mono sine tone.
    pub fn add_tone(&self, name: &str, sample_rate: u32, seconds: f64) -> PathBuf {
        let frames = (sample_rate as f64 * seconds).round() as usize;
        let samples = sine_i16(440.0, sample_rate, frames, TONE_AMPLITUDE);
        self.add_i16(name, sample_rate, 1, &samples)
    }

    /// Add a 16-bit WAV from interleaved samples.
    pub fn add_i16(&self, name: &str, sample_rate: u32, channels: u16, samples: &[i16]) -> PathBuf {
        let path = self.data_dir.join(name);
        write_i16(&path, sample_rate, channels, samples);
        path
    }

    /// Add a 32-bit float WAV from interleaved samples.
    pub fn add_f32(&self, name: &str, sample_rate: u32, channels: u16, samples: &[f32]) -> PathBuf {
        let path = self.data_dir.join(name);
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).expect("Failed to create WAV");
        for &s in samples {
            writer.write_sample(s).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }

    /// Add an arbitrary file.
    pub fn add_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.data_dir.join(name);
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }
}

impl Default for SampleDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Sine samples scaled to `amplitude` and rounded to i16.
pub fn sine_i16(freq: f64, sample_rate: u32, frames: usize, amplitude: f64) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            ((2.0 * std::f64::consts::PI * freq * t).sin() * amplitude).round() as i16
        })
        .collect()
}

/// Write a 16-bit PCM WAV.
pub fn write_i16(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create WAV");
    for &s in samples {
        writer.write_sample(s).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}
