//! muffle - detect labeled acoustic events in a recording and mute them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use muffle_audio::Waveform;
use muffle_audio::mfcc::MfccConfig;
use muffle_detect::{
    DetectedEvent, MatcherConfig, MuteOptions, TemplateTable, detect_events, mute_segments,
};
use muffle_media::{Ffmpeg, MediaSource, Remuxer, YtDlp, decode_wav, encode_wav};
use tracing_subscriber::EnvFilter;

/// Detect labeled acoustic events in a recording and mute them.
#[derive(Parser, Debug)]
#[command(name = "muffle")]
#[command(about = "Detect labeled acoustic events in a recording and mute them")]
struct Args {
    /// Local WAV file to process
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Media URL to fetch (needs yt-dlp and ffmpeg on PATH)
    #[arg(short, long)]
    url: Option<String>,

    /// JSON file with the event template table
    #[arg(short, long)]
    templates: PathBuf,

    /// Event label to mute
    #[arg(short, long, default_value = "dog_bark")]
    label: String,

    /// Output path: muted WAV for --input, remuxed video for --url
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Analysis sample rate applied to fetched media
    #[arg(long, default_value_t = 22050)]
    sample_rate: u32,

    /// Detection window length in seconds
    #[arg(long, default_value_t = 1.0)]
    window_secs: f64,

    /// Hop between detection windows in seconds
    #[arg(long, default_value_t = 0.25)]
    hop_secs: f64,

    /// Linear fade length in seconds at mute boundaries (0 = hard cut)
    #[arg(long, default_value_t = 0.0)]
    fade_secs: f64,

    /// Report detections and exit without touching the audio
    #[arg(long)]
    detect_only: bool,

    /// Keep the temporary working directory of fetched files
    #[arg(long)]
    keep_temp: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let table = TemplateTable::load(&args.templates)
        .with_context(|| format!("loading templates from {}", args.templates.display()))?;
    tracing::info!(templates = table.len(), dim = table.dim(), "template table loaded");

    let matcher_cfg = MatcherConfig {
        window_secs: args.window_secs,
        hop_secs: args.hop_secs,
        mfcc: MfccConfig::default(),
    };

    match (&args.input, &args.url) {
        (Some(input), None) => run_local(&args, input, &table, &matcher_cfg),
        (None, Some(url)) => run_remote(&args, url, &table, &matcher_cfg),
        _ => bail!("exactly one of --input or --url is required"),
    }
}

/// Detect and mute within a local WAV file.
fn run_local(
    args: &Args,
    input: &Path,
    table: &TemplateTable,
    matcher_cfg: &MatcherConfig,
) -> Result<()> {
    let wave =
        decode_wav(input).with_context(|| format!("decoding {}", input.display()))?;
    let events = detect_and_report(&wave, table, matcher_cfg, &args.label);
    if args.detect_only {
        return Ok(());
    }

    let muted = mute_segments(
        wave,
        &events,
        &args.label,
        &MuteOptions {
            fade_secs: args.fade_secs,
        },
    );
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension("muted.wav"));
    encode_wav(&output, &muted).with_context(|| format!("writing {}", output.display()))?;
    println!("muted audio written to {}", output.display());
    Ok(())
}

/// Fetch a URL, detect and mute, then remux the edited audio back into the
/// video stream.
fn run_remote(
    args: &Args,
    url: &str,
    table: &TemplateTable,
    matcher_cfg: &MatcherConfig,
) -> Result<()> {
    let dir = tempfile::tempdir().context("creating working directory")?;
    let ffmpeg = Ffmpeg::default();

    let fetched = YtDlp::new(dir.path())
        .fetch_media(url)
        .context("fetching media")?;

    let normalized = dir.path().join("normalized.wav");
    ffmpeg
        .transcode_wav(&fetched.audio_path, &normalized, args.sample_rate)
        .context("normalizing fetched audio")?;
    let wave = decode_wav(&normalized).context("decoding fetched audio")?;

    let events = detect_and_report(&wave, table, matcher_cfg, &args.label);
    if args.detect_only {
        finish_workdir(dir, args.keep_temp);
        return Ok(());
    }

    let muted = mute_segments(
        wave,
        &events,
        &args.label,
        &MuteOptions {
            fade_secs: args.fade_secs,
        },
    );
    let muted_wav = dir.path().join("muted.wav");
    encode_wav(&muted_wav, &muted).context("writing muted audio")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("video_out.mp4"));
    ffmpeg
        .remux(&fetched.video_path, &muted_wav, &output)
        .context("remuxing edited audio into video")?;
    println!("muted video written to {}", output.display());

    finish_workdir(dir, args.keep_temp);
    Ok(())
}

fn detect_and_report(
    wave: &Waveform,
    table: &TemplateTable,
    cfg: &MatcherConfig,
    target_label: &str,
) -> Vec<DetectedEvent> {
    tracing::info!(
        duration_secs = wave.duration_secs(),
        sample_rate = wave.sample_rate,
        "analyzing audio"
    );
    let events = detect_events(wave, table, cfg);

    if events.is_empty() {
        println!("no events detected");
    }
    for e in &events {
        let marker = if e.label == target_label { "*" } else { " " };
        println!(
            "{marker} {:>7.2}s - {:>7.2}s  {:<20} confidence {:.2}",
            e.start_time_sec, e.end_time_sec, e.label, e.confidence
        );
    }
    events
}

fn finish_workdir(dir: tempfile::TempDir, keep: bool) {
    if keep {
        let path = dir.keep();
        println!("working files kept in {}", path.display());
    }
}
