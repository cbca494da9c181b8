//! Mel-scale conversion, Hamming window, and triangular filterbank.

use std::f64::consts::PI;

/// Generates a Hamming window of length `n`.
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

/// Hz to mel: `2595 * log10(1 + f/700)`.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Mel back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0f64.powf(mel / 2595.0) - 1.0)
}

/// Builds the triangular mel filterbank.
///
/// Returns `[num_mels][half_fft]` weights, `half_fft = fft_size / 2 + 1`.
/// Band edges are `num_mels + 2` points equally spaced on the mel scale
/// between `low_freq` and `high_freq`, forced to strictly increasing FFT
/// bins so every filter covers at least one bin.
pub fn mel_filterbank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);
    let mel_step = (mel_high - mel_low) / (num_mels + 1) as f64;

    let mut bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let hz = mel_to_hz(mel_low + i as f64 * mel_step);
            let bin = (hz * fft_size as f64 / sample_rate as f64).round() as isize;
            bin.clamp(0, half_fft as isize - 1) as usize
        })
        .collect();

    // Keep edges strictly increasing so no filter collapses to zero width.
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = (bins[i - 1] + 1).min(half_fft - 1).max(bins[i - 1]);
        }
    }

    let mut bank = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
        let mut filter = vec![0.0f64; half_fft];

        if center > left {
            for k in left..=center.min(half_fft - 1) {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right.min(half_fft - 1) {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        bank.push(filter);
    }
    bank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_is_symmetric() {
        let w = hamming_window(551);
        assert_eq!(w.len(), 551);
        for i in 0..275 {
            assert!((w[i] - w[550 - i]).abs() < 1e-12, "asymmetry at {i}");
        }
        assert!((w[0] - 0.08).abs() < 0.01);
    }

    #[test]
    fn hz_mel_roundtrip() {
        for &hz in &[0.0, 100.0, 440.0, 1000.0, 4000.0, 11025.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((hz - back).abs() < 1e-6, "roundtrip failed for {hz} Hz");
        }
    }

    #[test]
    fn filterbank_shape_and_sign() {
        let bank = mel_filterbank(40, 1024, 22050, 0.0, 11025.0);
        assert_eq!(bank.len(), 40);
        assert_eq!(bank[0].len(), 513);
        for filter in &bank {
            assert!(filter.iter().all(|&v| v >= 0.0));
            assert!(
                filter.iter().any(|&v| v > 0.0),
                "filter must cover at least one bin"
            );
        }
    }

    #[test]
    fn filterbank_low_rate_does_not_panic() {
        // Narrow spectrum: bins saturate at the top without overflowing.
        let bank = mel_filterbank(40, 64, 8000, 0.0, 4000.0);
        assert_eq!(bank.len(), 40);
    }
}
