//! WAV decoding and encoding on top of hound.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{AudioError, AudioResult, ReadError};

/// Decoded contents of an uncompressed WAV file.
///
/// Integer PCM keeps its native amplitude scale (an i16 file yields values in
/// -32768..=32767); IEEE float keeps its float values.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Format of the source file.
    pub spec: WavSpec,
    /// Interleaved samples.
    pub samples: Vec<f64>,
}

impl DecodedAudio {
    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.spec.channels.max(1) as usize
    }
}

/// Decode a WAV file.
pub fn decode(path: &Path) -> Result<DecodedAudio, ReadError> {
    if !path.is_file() {
        return Err(ReadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let decode_err = |source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(decode_err)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>(),
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>(),
    }
    .map_err(decode_err)?;

    Ok(DecodedAudio { spec, samples })
}

/// Write interleaved samples using `spec`, quantizing for integer formats.
pub fn encode(path: &Path, spec: WavSpec, samples: &[f64]) -> AudioResult<()> {
    let write_err = |source| AudioError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;

    match spec.sample_format {
        SampleFormat::Int => {
            let bits = spec.bits_per_sample.clamp(1, 32) as u32;
            let max = ((1i64 << (bits - 1)) - 1) as f64;
            let min = -(1i64 << (bits - 1)) as f64;
            for &s in samples {
                let q = s.round().clamp(min, max) as i32;
                writer.write_sample(q).map_err(write_err)?;
            }
        }
        SampleFormat::Float => {
            for &s in samples {
                writer.write_sample(s as f32).map_err(write_err)?;
            }
        }
    }

    writer.finalize().map_err(write_err)
}
