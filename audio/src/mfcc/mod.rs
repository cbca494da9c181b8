//! MFCC feature extraction.
//!
//! Summarizes a slice of audio as one fixed-length vector: per-frame
//! Mel-Frequency Cepstral Coefficients, reduced across frames to the
//! per-coefficient mean and standard deviation, concatenated mean‖std.
//! The reduction makes the vector length independent of slice duration,
//! so windows of different lengths stay comparable.
//!
//! Defaults: 25 ms frames with a 10 ms hop, 40 mel bands spanning
//! 0 Hz to Nyquist, 40 cepstral coefficients (vector length 80).
//! All arithmetic runs in f64; output is f32.

mod dct;
mod fft;
mod mel;

use crate::error::FeatureError;

/// Configuration for MFCC extraction.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    /// Analysis frame length in seconds (default: 0.025).
    pub frame_len_secs: f64,
    /// Hop between frames in seconds (default: 0.010).
    pub frame_shift_secs: f64,
    /// Number of mel filterbank bands (default: 40).
    pub num_mels: usize,
    /// Number of cepstral coefficients kept after the DCT (default: 40).
    pub num_ceps: usize,
    /// Low cutoff of the filterbank in Hz (default: 0).
    pub low_freq: f64,
    /// High cutoff in Hz; values <= 0 mean Nyquist + high_freq (default: 0).
    pub high_freq: f64,
    /// Per-frame pre-emphasis coefficient, 0 disables (default: 0).
    pub pre_emphasis: f64,
    /// Floor applied to filterbank energies before the log (default: 1e-10).
    pub energy_floor: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            frame_len_secs: 0.025,
            frame_shift_secs: 0.010,
            num_mels: 40,
            num_ceps: 40,
            low_freq: 0.0,
            high_freq: 0.0,
            pre_emphasis: 0.0,
            energy_floor: 1e-10,
        }
    }
}

impl MfccConfig {
    /// Length of the extracted feature vector: mean‖std of `num_ceps`
    /// coefficients.
    pub fn feature_len(&self) -> usize {
        2 * self.num_ceps
    }
}

/// MFCC extractor bound to one sample rate.
///
/// Precomputes the window, filterbank and DCT matrix for that rate; a
/// single instance can serve many slices and is safe to share across
/// threads.
pub struct Extractor {
    cfg: MfccConfig,
    frame_len: usize,
    frame_shift: usize,
    fft_size: usize,
    window: Vec<f64>,
    filterbank: Vec<Vec<f64>>,
    dct: Vec<Vec<f64>>,
}

impl Extractor {
    /// Creates an extractor for the given configuration and sample rate.
    /// The sample rate must be positive.
    pub fn new(cfg: MfccConfig, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0, "sample rate must be positive");

        let frame_len = ((cfg.frame_len_secs * sample_rate as f64).round() as usize).max(1);
        let frame_shift = ((cfg.frame_shift_secs * sample_rate as f64).round() as usize).max(1);
        let fft_size = fft::next_pow2(frame_len);

        let nyquist = sample_rate as f64 / 2.0;
        let high_freq = if cfg.high_freq <= 0.0 {
            nyquist + cfg.high_freq
        } else {
            cfg.high_freq
        };

        let window = mel::hamming_window(frame_len);
        let filterbank =
            mel::mel_filterbank(cfg.num_mels, fft_size, sample_rate, cfg.low_freq, high_freq);
        let dct = dct::dct_matrix(cfg.num_ceps, cfg.num_mels);

        Self {
            cfg,
            frame_len,
            frame_shift,
            fft_size,
            window,
            filterbank,
            dct,
        }
    }

    /// Extracts the mean‖std MFCC summary vector from a slice of samples.
    ///
    /// Fails with [`FeatureError::EmptyAudio`] on an empty slice and
    /// [`FeatureError::NonFinite`] when a sample is NaN or infinite. A fully
    /// silent slice (every sample exactly 0.0) returns an all-zero vector:
    /// silence is meaningful, not an error. A non-empty slice shorter than
    /// one frame is zero-padded to a single frame.
    ///
    /// Deterministic: identical samples and rate produce a bit-identical
    /// vector.
    pub fn extract(&self, samples: &[f32]) -> Result<Vec<f32>, FeatureError> {
        if samples.is_empty() {
            return Err(FeatureError::EmptyAudio);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(FeatureError::NonFinite { index });
        }
        if samples.iter().all(|&s| s == 0.0) {
            return Ok(vec![0.0; self.cfg.feature_len()]);
        }

        let num_frames = if samples.len() < self.frame_len {
            1
        } else {
            (samples.len() - self.frame_len) / self.frame_shift + 1
        };

        let num_ceps = self.cfg.num_ceps;
        let half_fft = self.fft_size / 2 + 1;

        let mut ceps_frames: Vec<Vec<f64>> = Vec::with_capacity(num_frames);
        let mut frame = vec![0.0f64; self.frame_len];
        let mut real = vec![0.0f64; self.fft_size];
        let mut imag = vec![0.0f64; self.fft_size];
        let mut power = vec![0.0f64; half_fft];
        let mut log_mel = vec![0.0f64; self.cfg.num_mels];

        for t in 0..num_frames {
            let offset = t * self.frame_shift;
            let avail = (samples.len() - offset).min(self.frame_len);

            for i in 0..avail {
                frame[i] = samples[offset + i] as f64;
            }
            for v in &mut frame[avail..] {
                *v = 0.0;
            }

            if self.cfg.pre_emphasis > 0.0 {
                for i in (1..self.frame_len).rev() {
                    frame[i] -= self.cfg.pre_emphasis * frame[i - 1];
                }
                frame[0] *= 1.0 - self.cfg.pre_emphasis;
            }

            // Window, zero-pad to FFT size.
            for i in 0..self.frame_len {
                real[i] = frame[i] * self.window[i];
            }
            for v in &mut real[self.frame_len..] {
                *v = 0.0;
            }
            for v in &mut imag {
                *v = 0.0;
            }

            fft::fft(&mut real, &mut imag);

            for k in 0..half_fft {
                power[k] = real[k] * real[k] + imag[k] * imag[k];
            }

            for (m, filter) in self.filterbank.iter().enumerate() {
                let mut energy = 0.0f64;
                for (k, &w) in filter.iter().enumerate() {
                    energy += w * power[k];
                }
                log_mel[m] = energy.max(self.cfg.energy_floor).ln();
            }

            let ceps: Vec<f64> = self
                .dct
                .iter()
                .map(|row| row.iter().zip(&log_mel).map(|(w, x)| w * x).sum())
                .collect();
            ceps_frames.push(ceps);
        }

        // Reduce across frames: per-coefficient mean and population std.
        let t = ceps_frames.len() as f64;
        let mut out = vec![0.0f32; 2 * num_ceps];
        for c in 0..num_ceps {
            let mean = ceps_frames.iter().map(|f| f[c]).sum::<f64>() / t;
            let var = ceps_frames
                .iter()
                .map(|f| {
                    let d = f[c] - mean;
                    d * d
                })
                .sum::<f64>()
                / t;
            out[c] = mean as f32;
            out[num_ceps + c] = var.sqrt() as f32;
        }
        Ok(out)
    }

    /// The configuration this extractor was built with.
    pub fn config(&self) -> &MfccConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, secs: f64, sample_rate: u32) -> Vec<f32> {
        let n = (secs * sample_rate as f64) as usize;
        (0..n)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    fn euclidean(a: &[f32], b: &[f32]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| {
                let d = x as f64 - y as f64;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    #[test]
    fn vector_has_twice_num_ceps_entries() {
        let cfg = MfccConfig::default();
        let extractor = Extractor::new(cfg.clone(), 22050);
        let features = extractor.extract(&sine(440.0, 1.0, 22050)).unwrap();
        assert_eq!(features.len(), cfg.feature_len());
        assert!(features.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = Extractor::new(MfccConfig::default(), 22050);
        let samples = sine(880.0, 0.7, 22050);
        let a = extractor.extract(&samples).unwrap();
        let b = extractor.extract(&samples).unwrap();
        assert_eq!(a, b, "repeated extraction must be bit-identical");
    }

    #[test]
    fn empty_slice_is_an_error() {
        let extractor = Extractor::new(MfccConfig::default(), 22050);
        assert!(matches!(
            extractor.extract(&[]),
            Err(FeatureError::EmptyAudio)
        ));
    }

    #[test]
    fn nan_sample_is_an_error() {
        let extractor = Extractor::new(MfccConfig::default(), 22050);
        let mut samples = sine(440.0, 0.1, 22050);
        samples[50] = f32::NAN;
        assert!(matches!(
            extractor.extract(&samples),
            Err(FeatureError::NonFinite { index: 50 })
        ));
    }

    #[test]
    fn silence_yields_all_zero_vector() {
        let cfg = MfccConfig::default();
        let extractor = Extractor::new(cfg.clone(), 22050);
        let features = extractor.extract(&vec![0.0; 22050]).unwrap();
        assert_eq!(features, vec![0.0; cfg.feature_len()]);
    }

    #[test]
    fn sub_frame_slice_is_padded_to_one_frame() {
        let cfg = MfccConfig::default();
        let extractor = Extractor::new(cfg.clone(), 22050);
        // 100 samples is well below the 551-sample frame.
        let features = extractor.extract(&sine(440.0, 100.0 / 22050.0, 22050)).unwrap();
        assert_eq!(features.len(), cfg.feature_len());
        // One frame means zero deviation across frames.
        assert!(features[cfg.num_ceps..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn duration_invariant_comparison() {
        // Same tone at different lengths lands near itself, far from a
        // different tone.
        let extractor = Extractor::new(MfccConfig::default(), 22050);
        let short = extractor.extract(&sine(440.0, 0.5, 22050)).unwrap();
        let long = extractor.extract(&sine(440.0, 2.0, 22050)).unwrap();
        let other = extractor.extract(&sine(2000.0, 1.0, 22050)).unwrap();

        let same_tone = euclidean(&short, &long);
        let diff_tone = euclidean(&short, &other);
        assert!(
            same_tone < diff_tone,
            "same tone should be closer: {same_tone} vs {diff_tone}"
        );
    }
}
