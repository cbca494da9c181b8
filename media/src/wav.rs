//! WAV file decode/encode.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use muffle_audio::Waveform;

use crate::error::MediaError;

/// Decodes a WAV file into a mono [`Waveform`].
///
/// Integer samples are normalized by `2^(bits-1)`; float files are read
/// as-is. Multi-channel audio is downmixed to mono by averaging the
/// channels of each frame.
pub fn decode_wav(path: impl AsRef<Path>) -> Result<Waveform, MediaError> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "decoding wav"
    );

    if spec.channels == 0 {
        return Err(MediaError::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: "zero channels".to_string(),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Writes a mono waveform as 16-bit PCM WAV.
/// Samples are clamped to [-1.0, 1.0] before quantization.
pub fn encode_wav(path: impl AsRef<Path>, wave: &Waveform) -> Result<(), MediaError> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate: wave.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    tracing::debug!(path = %path.display(), samples = wave.len(), "encoding wav");

    let mut writer = WavWriter::create(path, spec)?;
    for &s in &wave.samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
