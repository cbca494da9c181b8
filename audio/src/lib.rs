//! Audio primitives for the muffle pipeline.
//!
//! This crate provides:
//!
//! - [`Waveform`]: decoded mono audio samples plus sample rate, the unit of
//!   exchange for the whole pipeline
//! - [`mfcc`]: MFCC feature extraction, summarizing a slice of audio as a
//!   fixed-length spectral-shape vector
//!
//! # Example
//!
//! ```rust
//! use muffle_audio::{Waveform, mfcc::{Extractor, MfccConfig}};
//!
//! let wave = Waveform::new(vec![0.5; 22050], 22050);
//! let cfg = MfccConfig::default();
//! let extractor = Extractor::new(cfg.clone(), wave.sample_rate);
//! let features = extractor.extract(&wave.samples).unwrap();
//! assert_eq!(features.len(), cfg.feature_len());
//! ```

pub mod mfcc;

mod error;
mod wave;

pub use error::FeatureError;
pub use wave::Waveform;
