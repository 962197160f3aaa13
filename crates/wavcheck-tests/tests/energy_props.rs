//! Property-based tests for the energy and resampling numerics.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wavcheck-tests --test energy_props
//! ```

use proptest::prelude::*;

use wavcheck_audio::energy::{chunk_frames, energy, short_term_energy};
use wavcheck_audio::resample::{resample_channel, target_len};

fn samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, 0..2048)
}

proptest! {
    /// Chunk energy is never negative.
    #[test]
    fn energy_is_non_negative(chunk in samples()) {
        prop_assert!(energy(&chunk) >= 0.0);
    }

    /// Summed short-term energy is never negative, for any layout.
    #[test]
    fn short_term_energy_is_non_negative(
        data in samples(),
        channels in 1u16..8,
        frames in 1usize..4096,
    ) {
        prop_assert!(short_term_energy(&data, channels, frames) >= 0.0);
    }

    /// Full chunks sum to total power over chunk length.
    #[test]
    fn full_chunks_sum_to_total(data in prop::collection::vec(-1.0f64..1.0, 1..64), chunks in 1usize..16) {
        let signal: Vec<f64> = data.iter().cycle().take(data.len() * chunks).copied().collect();
        let total: f64 = signal.iter().map(|s| s * s).sum();
        let expected = total / data.len() as f64;
        let actual = short_term_energy(&signal, 1, data.len());
        prop_assert!((actual - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    /// Chunks are never empty, whatever the rate and duration.
    #[test]
    fn chunk_frames_is_positive(rate in 0u32..400_000, ms in 0u32..1000) {
        prop_assert!(chunk_frames(rate, ms) >= 1);
    }

    /// The resampler returns exactly the requested length.
    #[test]
    fn resample_length_is_exact(data in prop::collection::vec(-1.0f64..1.0, 0..512), num in 0usize..1024) {
        prop_assert_eq!(resample_channel(&data, num).len(), num);
    }

    /// Target length is within rounding of the exact ratio.
    #[test]
    fn target_len_rounds(len in 0usize..1_000_000, rate in 1u32..200_000, target in 1u32..200_000) {
        let exact = len as f64 * target as f64 / rate as f64;
        prop_assert!((target_len(len, rate, target) as f64 - exact).abs() <= 0.5);
    }
}

#[test]
fn empty_input_has_zero_energy() {
    assert_eq!(energy(&[]), 0.0);
    assert_eq!(short_term_energy(&[], 2, 100), 0.0);
}
