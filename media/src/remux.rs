//! Audio replacement and transcoding via ffmpeg.

use std::path::{Path, PathBuf};

use crate::error::MediaError;
use crate::tool;

/// Produces a new media file from a video stream and a replacement audio
/// track.
pub trait Remuxer {
    fn remux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MediaError>;
}

/// ffmpeg-backed [`Remuxer`] plus WAV normalization.
pub struct Ffmpeg {
    /// Program to invoke (default: `ffmpeg`, resolved via PATH).
    pub program: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl Ffmpeg {
    /// Converts any audio file to mono 16-bit PCM WAV at `sample_rate`.
    /// The pipeline analyzes at one fixed rate regardless of the source.
    pub fn transcode_wav(
        &self,
        input: &Path,
        output: &Path,
        sample_rate: u32,
    ) -> Result<(), MediaError> {
        tracing::info!(
            input = %input.display(),
            sample_rate,
            "normalizing audio to mono wav"
        );
        tool::run(&self.program, &transcode_args(input, output, sample_rate))?;
        Ok(())
    }
}

/// Arguments replacing the video's audio track: video stream copied,
/// replacement audio encoded as AAC at 192k.
fn remux_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        video.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "192k".to_string(),
        "-y".to_string(),
        output.display().to_string(),
    ]
}

fn transcode_args(input: &Path, output: &Path, sample_rate: u32) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.display().to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "pcm_s16le".to_string(),
        "-ar".to_string(),
        sample_rate.to_string(),
        "-ac".to_string(),
        "1".to_string(),
        "-y".to_string(),
        output.display().to_string(),
    ]
}

impl Remuxer for Ffmpeg {
    fn remux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MediaError> {
        tracing::info!(
            video = %video.display(),
            audio = %audio.display(),
            output = %output.display(),
            "remuxing audio into video"
        );
        tool::run(&self.program, &remux_args(video, audio, output))?;
        Ok(())
    }
}
