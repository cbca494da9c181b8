//! Zeroing of detected event ranges within a waveform.

use muffle_audio::Waveform;

use crate::matcher::DetectedEvent;

/// Options for [`mute_segments`].
#[derive(Debug, Clone)]
pub struct MuteOptions {
    /// Length in seconds of a linear fade applied just outside each muted
    /// range (fade-out before, fade-in after). 0 disables fading and mutes
    /// with a hard cut (default: 0.0).
    pub fade_secs: f64,
}

impl Default for MuteOptions {
    fn default() -> Self {
        Self { fade_secs: 0.0 }
    }
}

/// Zeroes the sample ranges of all events whose label equals `target_label`.
///
/// Consumes the waveform and returns the same buffer mutated in place;
/// sample rate and length never change. Event times convert to sample
/// indices via `round(time * rate)`; ranges reaching outside the buffer are
/// clamped, never an out-of-bounds access. With the default options the
/// operation is idempotent (zeroing twice is a no-op) and local (samples
/// outside the target ranges are untouched).
pub fn mute_segments(
    mut wave: Waveform,
    events: &[DetectedEvent],
    target_label: &str,
    opts: &MuteOptions,
) -> Waveform {
    let rate = wave.sample_rate as f64;
    let len = wave.samples.len();
    let fade_len = ((opts.fade_secs * rate).round() as usize).min(len);

    let mut muted = 0usize;
    for event in events.iter().filter(|e| e.label == target_label) {
        let start = ((event.start_time_sec * rate).round() as i64).clamp(0, len as i64) as usize;
        let end = ((event.end_time_sec * rate).round() as i64).clamp(start as i64, len as i64) as usize;
        if event.start_time_sec < 0.0 || event.end_time_sec > wave.duration_secs() {
            tracing::warn!(
                label = %event.label,
                end_time_sec = event.end_time_sec,
                duration = wave.duration_secs(),
                "event range clamped to waveform bounds"
            );
        }
        if start == end {
            continue;
        }

        if fade_len > 0 {
            apply_fades(&mut wave.samples, start, end, fade_len);
        }
        for s in &mut wave.samples[start..end] {
            *s = 0.0;
        }
        muted += 1;
    }

    tracing::debug!(target_label, muted, "segment muting finished");
    wave
}

/// Linear fade-out over `fade_len` samples before `start` and fade-in over
/// `fade_len` samples after `end`, clamped to the buffer.
fn apply_fades(samples: &mut [f32], start: usize, end: usize, fade_len: usize) {
    let fade_start = start.saturating_sub(fade_len);
    for i in fade_start..start {
        samples[i] *= (start - i) as f32 / fade_len as f32;
    }
    let fade_end = (end + fade_len).min(samples.len());
    for i in end..fade_end {
        let gain = (i - end + 1) as f32 / fade_len as f32;
        samples[i] *= gain;
    }
}
