//! Sliding-window nearest-template event matcher.

use std::collections::BTreeMap;

use muffle_audio::Waveform;
use muffle_audio::mfcc::{Extractor, MfccConfig};
use rayon::prelude::*;

use crate::template::TemplateTable;

/// Configuration for [`Matcher`].
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Candidate window length in seconds (default: 1.0).
    pub window_secs: f64,
    /// Hop between window starts in seconds (default: 0.25, i.e. 75%
    /// overlap). A shorter hop sharpens event boundaries at the cost of
    /// compute.
    pub hop_secs: f64,
    /// Feature extraction settings applied to every window.
    pub mfcc: MfccConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            hop_secs: 0.25,
            mfcc: MfccConfig::default(),
        }
    }
}

/// A detected event occurrence within the analyzed waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedEvent {
    /// Label of the matching template.
    pub label: String,
    /// Start of the event in seconds from the beginning of the waveform.
    pub start_time_sec: f64,
    /// End of the event in seconds. Always greater than the start and never
    /// past the waveform duration.
    pub end_time_sec: f64,
    /// Match confidence in [0, 1]; 1.0 means the window vector coincides
    /// with the template reference.
    pub confidence: f32,
}

/// Scans a waveform for windows whose feature vector falls within a
/// template's distance threshold.
///
/// # Algorithm
///
/// 1. Slide a window of `window_secs` every `hop_secs`; the final windows
///    are truncated at the waveform tail and still analyzed.
/// 2. Extract the MFCC summary vector of each window (windows are
///    independent; extraction fans out across threads and is re-collected
///    in window order, keeping the result deterministic).
/// 3. A window is a candidate for a label when the Euclidean distance to
///    that template is within its threshold;
///    `confidence = 1 - distance / threshold`.
/// 4. Candidates of one label whose spans touch or overlap merge into a
///    single event covering their union, at the maximum confidence.
/// 5. Same-label events still overlapping after the merge keep only the
///    highest-confidence one.
///
/// Multi-label hits on the same window are all retained; only same-label
/// overlaps are collapsed.
pub struct Matcher {
    cfg: MatcherConfig,
}

struct Candidate {
    start_sec: f64,
    end_sec: f64,
    confidence: f32,
}

impl Matcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: MatcherConfig) -> Self {
        Self { cfg }
    }

    /// Detects template matches, sorted by ascending start time.
    ///
    /// Never fails on valid input: an empty waveform, an empty table, or a
    /// table whose dimension does not fit the extractor output all yield an
    /// empty result.
    pub fn detect(&self, wave: &Waveform, table: &TemplateTable) -> Vec<DetectedEvent> {
        if wave.is_empty() || wave.sample_rate == 0 || table.is_empty() {
            return Vec::new();
        }
        if table.dim() != self.cfg.mfcc.feature_len() {
            tracing::warn!(
                table_dim = table.dim(),
                feature_len = self.cfg.mfcc.feature_len(),
                "template dimension does not match extractor output; no detections"
            );
            return Vec::new();
        }

        let rate = wave.sample_rate as f64;
        let window_len = ((self.cfg.window_secs * rate).round() as usize).max(1);
        let hop = ((self.cfg.hop_secs * rate).round() as usize).max(1);
        let extractor = Extractor::new(self.cfg.mfcc.clone(), wave.sample_rate);

        let starts: Vec<usize> = (0..wave.len()).step_by(hop).collect();
        tracing::debug!(
            windows = starts.len(),
            window_len,
            hop,
            "scanning waveform for template matches"
        );

        // Fan out per window; collect preserves window order.
        let window_hits: Vec<Vec<(usize, Candidate)>> = starts
            .par_iter()
            .map(|&start| self.scan_window(wave, &extractor, table, start, window_len))
            .collect();

        // Group candidates by label, keeping time order within each label.
        let labels: Vec<&str> = table.iter().map(|t| t.label.as_str()).collect();
        let mut by_label: BTreeMap<&str, Vec<Candidate>> = BTreeMap::new();
        for hits in window_hits {
            for (template_idx, cand) in hits {
                by_label
                    .entry(labels[template_idx])
                    .or_default()
                    .push(cand);
            }
        }

        let mut events: Vec<DetectedEvent> = Vec::new();
        for (label, cands) in by_label {
            let merged = merge_candidates(label, cands);
            events.extend(dedup_overlapping(merged));
        }

        events.sort_by(|a, b| {
            a.start_time_sec
                .total_cmp(&b.start_time_sec)
                .then_with(|| a.label.cmp(&b.label))
        });
        events
    }

    fn scan_window(
        &self,
        wave: &Waveform,
        extractor: &Extractor,
        table: &TemplateTable,
        start: usize,
        window_len: usize,
    ) -> Vec<(usize, Candidate)> {
        let end = (start + window_len).min(wave.len());
        let vector = match extractor.extract(&wave.samples[start..end]) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%err, start, "skipping window");
                return Vec::new();
            }
        };

        let rate = wave.sample_rate as f64;
        let start_sec = start as f64 / rate;
        let end_sec = end as f64 / rate;

        let mut hits = Vec::new();
        for (idx, template) in table.iter().enumerate() {
            if !template.is_enabled() {
                continue;
            }
            let distance = euclidean_distance(&vector, &template.reference);
            let threshold = template.threshold as f64;
            if distance <= threshold {
                let confidence = ((1.0 - distance / threshold).clamp(0.0, 1.0)) as f32;
                hits.push((
                    idx,
                    Candidate {
                        start_sec,
                        end_sec,
                        confidence,
                    },
                ));
            }
        }
        hits
    }
}

/// Euclidean distance with f64 accumulation.
/// Returns infinity on a dimension mismatch, which can never match.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    let mut sum = 0.0f64;
    for i in 0..a.len() {
        let d = a[i] as f64 - b[i] as f64;
        sum += d * d;
    }
    sum.sqrt()
}

/// Collapses time-ordered candidates whose spans touch or overlap into
/// events covering their union. Confidence is the maximum across merged
/// windows; on ties the earlier window wins (only a strictly higher value
/// replaces it).
fn merge_candidates(label: &str, cands: Vec<Candidate>) -> Vec<DetectedEvent> {
    let mut merged: Vec<DetectedEvent> = Vec::new();
    for cand in cands {
        match merged.last_mut() {
            Some(cur) if cand.start_sec <= cur.end_time_sec => {
                if cand.end_sec > cur.end_time_sec {
                    cur.end_time_sec = cand.end_sec;
                }
                if cand.confidence > cur.confidence {
                    cur.confidence = cand.confidence;
                }
            }
            _ => merged.push(DetectedEvent {
                label: label.to_string(),
                start_time_sec: cand.start_sec,
                end_time_sec: cand.end_sec,
                confidence: cand.confidence,
            }),
        }
    }
    merged
}

/// Keeps only the highest-confidence event among same-label events whose
/// ranges still overlap after merging.
fn dedup_overlapping(events: Vec<DetectedEvent>) -> Vec<DetectedEvent> {
    let mut out: Vec<DetectedEvent> = Vec::new();
    for event in events {
        match out.last_mut() {
            Some(prev) if event.start_time_sec < prev.end_time_sec => {
                if event.confidence > prev.confidence {
                    *prev = event;
                }
            }
            _ => out.push(event),
        }
    }
    out
}
