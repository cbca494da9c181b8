//! Media retrieval via yt-dlp.

use std::path::{Path, PathBuf};

use crate::error::MediaError;
use crate::tool;

/// Paths produced by a fetch: the video stream and an extracted WAV audio
/// track, both local files.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
}

/// Retrieves remote media into local files the pipeline can work on.
pub trait MediaSource {
    fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError>;
}

/// yt-dlp-backed [`MediaSource`]: extracts the audio track as WAV and
/// downloads the best video-only stream into `work_dir`.
pub struct YtDlp {
    /// Program to invoke (default: `yt-dlp`, resolved via PATH).
    pub program: PathBuf,
    /// Directory receiving the downloaded files.
    pub work_dir: PathBuf,
}

impl YtDlp {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            work_dir: work_dir.into(),
        }
    }
}

/// Arguments for the audio-only WAV extraction.
fn audio_args(url: &str, output: &Path) -> Vec<String> {
    vec![
        "-x".to_string(),
        "--audio-format".to_string(),
        "wav".to_string(),
        "-o".to_string(),
        output.display().to_string(),
        url.to_string(),
    ]
}

/// Arguments for the video-only stream download.
fn video_args(url: &str, output: &Path) -> Vec<String> {
    vec![
        "--format".to_string(),
        "bestvideo".to_string(),
        "-o".to_string(),
        output.display().to_string(),
        url.to_string(),
    ]
}

impl MediaSource for YtDlp {
    fn fetch_media(&self, url: &str) -> Result<FetchedMedia, MediaError> {
        let audio_path = self.work_dir.join("audio.wav");
        let video_path = self.work_dir.join("video.mp4");

        tracing::info!(url, "fetching audio track");
        tool::run(&self.program, &audio_args(url, &audio_path))?;

        tracing::info!(url, "fetching video stream");
        tool::run(&self.program, &video_args(url, &video_path))?;

        Ok(FetchedMedia {
            video_path,
            audio_path,
        })
    }
}
