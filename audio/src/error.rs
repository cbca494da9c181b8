use thiserror::Error;

/// Errors returned by feature extraction.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("empty audio: feature extraction needs at least one sample")]
    EmptyAudio,

    #[error("non-finite sample at index {index}")]
    NonFinite { index: usize },
}
