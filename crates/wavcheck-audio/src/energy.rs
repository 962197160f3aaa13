//! Short-term energy calculations.
//!
//! Samples are interleaved. A chunk covers a fixed number of frames, and its
//! energy is the sum of squared magnitudes normalized by the number of frames
//! in the chunk. The total is the sum of chunk energies, which keeps the value
//! independent of sample rate for a given duration.

/// Energy of a single chunk: sum of squared magnitudes over its length.
///
/// Returns 0.0 for an empty chunk.
pub fn energy(chunk: &[f64]) -> f64 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = chunk.iter().map(|s| s * s).sum();
    sum_of_squares / chunk.len() as f64
}

/// Number of frames in one chunk of `frame_ms` milliseconds at `sample_rate`.
///
/// Never returns 0.
pub fn chunk_frames(sample_rate: u32, frame_ms: u32) -> usize {
    let frames = (sample_rate as u64 * frame_ms as u64 + 500) / 1000;
    frames.max(1) as usize
}

/// Sum of per-chunk energies over interleaved samples.
///
/// Each chunk holds `frames_per_chunk` frames of `channels` samples; the
/// trailing chunk may be shorter.
pub fn short_term_energy(samples: &[f64], channels: u16, frames_per_chunk: usize) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let channels = channels.max(1) as usize;
    let chunk_len = frames_per_chunk.max(1) * channels;

    samples
        .chunks(chunk_len)
        // energy() normalizes by sample count; scale back to per-frame
        .map(|chunk| energy(chunk) * channels as f64)
        .sum()
}
