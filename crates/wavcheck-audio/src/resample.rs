//! FFT-based resampling by spectral interpolation.
//!
//! The signal is transformed, its spectrum truncated or zero-padded to the
//! target length, and transformed back. Duration is preserved; content above
//! the new Nyquist frequency is discarded when downsampling.

use rustfft::{num_complex::Complex, FftPlanner};

/// Target sample count for converting `len` samples from `rate` to `target_rate`.
pub fn target_len(len: usize, rate: u32, target_rate: u32) -> usize {
    if rate == 0 {
        return 0;
    }
    (len as f64 * target_rate as f64 / rate as f64).round() as usize
}

/// Resample a single channel to exactly `num` samples.
pub fn resample_channel(samples: &[f64], num: usize) -> Vec<f64> {
    let nx = samples.len();
    if nx == 0 || num == 0 {
        return vec![0.0; num];
    }
    if nx == num {
        return samples.to_vec();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    planner.plan_fft_forward(nx).process(&mut spectrum);

    // Copy positive frequencies, including Nyquist when present
    let n = nx.min(num);
    let nyq = n / 2 + 1;
    let mut out = vec![Complex::new(0.0, 0.0); num];
    out[..nyq].copy_from_slice(&spectrum[..nyq]);

    // Split or join the shared Nyquist bin
    if n % 2 == 0 {
        if num < nx {
            out[n / 2] *= 2.0;
        } else {
            out[n / 2] *= 0.5;
        }
    }

    // Mirror into the negative frequencies for a real-valued result
    for k in 1..(num + 1) / 2 {
        out[num - k] = out[k].conj();
    }

    planner.plan_fft_inverse(num).process(&mut out);

    // rustfft is unnormalized: 1/num for the inverse, num/nx for the rescale
    let scale = 1.0 / nx as f64;
    out.iter().map(|c| c.re * scale).collect()
}

/// Resample interleaved samples with `channels` channels to `num` frames.
pub fn resample_interleaved(samples: &[f64], channels: u16, num: usize) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return resample_channel(samples, num);
    }

    let resampled: Vec<Vec<f64>> = (0..channels)
        .map(|ch| {
            let plane: Vec<f64> = samples.iter().skip(ch).step_by(channels).copied().collect();
            resample_channel(&plane, num)
        })
        .collect();

    let mut out = Vec::with_capacity(num * channels);
    for i in 0..num {
        for plane in &resampled {
            out.push(plane[i]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / rate as f64).sin())
            .collect()
    }

    fn power(samples: &[f64]) -> f64 {
        samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
    }

    #[test]
    fn test_target_len_rounds() {
        assert_eq!(target_len(48000, 48000, 24000), 24000);
        assert_eq!(target_len(101, 48000, 24000), 51);
        assert_eq!(target_len(100, 0, 24000), 0);
    }

    #[test]
    fn test_resample_identity() {
        let x = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_channel(&x, 3), x);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample_channel(&[], 0).is_empty());
        assert_eq!(resample_channel(&[], 4), vec![0.0; 4]);
    }

    #[test]
    fn test_resample_constant_stays_constant() {
        let x = vec![0.25; 64];
        for y in [resample_channel(&x, 32), resample_channel(&x, 96)] {
            for s in y {
                assert!((s - 0.25).abs() < 1e-9, "sample {}", s);
            }
        }
    }

    #[test]
    fn test_resample_preserves_sine_power() {
        // 1 kHz tone is well below both Nyquist frequencies
        let x = sine(1000.0, 48000, 4800);
        for num in [2400, 7200] {
            let y = resample_channel(&x, num);
            assert_eq!(y.len(), num);
            assert!((power(&y) - power(&x)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_resample_interleaved_keeps_channels_apart() {
        let mut x = Vec::new();
        for _ in 0..32 {
            x.push(1.0);
            x.push(-0.5);
        }
        let y = resample_interleaved(&x, 2, 16);
        assert_eq!(y.len(), 32);
        for frame in y.chunks(2) {
            assert!((frame[0] - 1.0).abs() < 1e-9);
            assert!((frame[1] + 0.5).abs() < 1e-9);
        }
    }
}
