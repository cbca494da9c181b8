//! Acoustic event detection and segment muting.
//!
//! # Architecture
//!
//! The pipeline runs in three stages over an owned [`Waveform`]:
//!
//! 1. [`extract_features`]: a slice of audio -> fixed-length MFCC summary
//!    vector (mean‖std of per-frame cepstra)
//! 2. [`detect_events`]: slide a window across the waveform, compare each
//!    window's vector against a [`TemplateTable`] of labeled references,
//!    merge and deduplicate matches into time-stamped [`DetectedEvent`]s
//! 3. [`mute_segments`]: zero the sample ranges of events carrying a target
//!    label
//!
//! Detection and muting never fail on well-formed input: an empty template
//! table, a silent waveform, or an event reaching past the end of the audio
//! degrade to "no detections" or a clamped range, not an error.

mod matcher;
mod mute;
mod template;

pub use matcher::{DetectedEvent, Matcher, MatcherConfig};
pub use mute::{MuteOptions, mute_segments};
pub use template::{EventTemplate, TemplateError, TemplateTable};

use muffle_audio::mfcc::{Extractor, MfccConfig};
use muffle_audio::{FeatureError, Waveform};

/// Extracts the MFCC summary vector for a whole waveform.
///
/// Convenience wrapper over [`muffle_audio::mfcc::Extractor`] for callers
/// that want one vector per clip (e.g., when recording a new template).
pub fn extract_features(wave: &Waveform, cfg: &MfccConfig) -> Result<Vec<f32>, FeatureError> {
    Extractor::new(cfg.clone(), wave.sample_rate).extract(&wave.samples)
}

/// Detects template matches across the waveform.
///
/// Returns events sorted by start time; same-label events never overlap.
pub fn detect_events(
    wave: &Waveform,
    table: &TemplateTable,
    cfg: &MatcherConfig,
) -> Vec<DetectedEvent> {
    Matcher::new(cfg.clone()).detect(wave, table)
}
