use crate::config::Settings;
use crate::ffmpeg;
use crate::init;
use crate::media::MediaKind;
use crate::planner;
use crate::probe::{self, DurationProbe, FfprobeProbe};
use crate::scan;
use crate::{logi, logok};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AnimateOptions {
    pub animation: PathBuf,
    pub audio_folder: PathBuf,
    pub output: PathBuf,
    /// Stop adding tracks once this many minutes are reached.
    pub time_limit_minutes: Option<u32>,
    pub crop_right: u32,
    pub crop_bottom: u32,
    pub keep_temp: bool,
}

#[derive(Debug, Clone)]
pub struct AnimateReport {
    pub output: PathBuf,
    pub tracks_used: usize,
    pub duration_seconds: f64,
    pub size_bytes: u64,
}

pub async fn run_animate(options: &AnimateOptions, settings: &Settings) -> Result<AnimateReport> {
    if !options.animation.is_file() {
        anyhow::bail!("Animation file does not exist: {}", options.animation.display());
    }
    init::require_folder(&options.audio_folder)?;
    init::check_tools(settings).await?;

    let probe = FfprobeProbe::new(settings.ffprobe.clone());
    run_animate_with(options, settings, &probe).await
}

pub async fn run_animate_with(
    options: &AnimateOptions,
    settings: &Settings,
    probe: &dyn DurationProbe,
) -> Result<AnimateReport> {
    let paths = scan::scan_folder(&options.audio_folder, MediaKind::Audio)?;
    let probed = probe::probe_tracks(probe, &paths).await;
    let limit = options.time_limit_minutes.map(|m| f64::from(m) * 60.0);
    let selected = planner::take_prefix(&probed.tracks, limit);
    if selected.is_empty() {
        anyhow::bail!("No usable audio files found in {}", options.audio_folder.display());
    }
    logi(format!(
        "Using {} of {} audio files",
        selected.len(),
        probed.tracks.len()
    ));

    let work = tempfile::Builder::new()
        .prefix("lofi-animate-")
        .tempdir()
        .context("Failed to create temp directory")?;
    let result = build_video(options, settings, probe, selected, work.path()).await;

    if options.keep_temp {
        let debug_dir = temp_copy_dir(&options.output);
        init::copy_tree(work.path(), &debug_dir)?;
        logi(format!("Temporary files saved to: {}", debug_dir.display()));
    }

    let (duration_seconds, tracks_used) = result?;
    let size_bytes = tokio::fs::metadata(&options.output)
        .await
        .map(|m| m.len())
        .unwrap_or(0);

    logok("Video generation complete!");
    logi(format!("Output: {}", options.output.display()));
    logi(format!("Duration: {:.1} minutes", duration_seconds / 60.0));
    logi(format!("File size: {:.1} MB", size_bytes as f64 / (1024.0 * 1024.0)));

    Ok(AnimateReport {
        output: options.output.clone(),
        tracks_used,
        duration_seconds,
        size_bytes,
    })
}

async fn build_video(
    options: &AnimateOptions,
    settings: &Settings,
    probe: &dyn DurationProbe,
    tracks: &[crate::media::AudioTrack],
    work: &Path,
) -> Result<(f64, usize)> {
    let inputs: Vec<PathBuf> = tracks.iter().map(|t| t.path().to_path_buf()).collect();
    let stitched = work.join("stitched_audio.m4a");
    logi("Stitching audio files");
    ffmpeg::concat_audio(settings, &inputs, &stitched)
        .await
        .context("Failed to stitch audio")?;

    let duration = probe
        .probe(&stitched)
        .await
        .context("Could not determine stitched audio duration")?;
    logok(format!("Stitched audio: {:.1} minutes", duration / 60.0));

    let animation = if options.crop_right > 0 || options.crop_bottom > 0 {
        let cropped = work.join("cropped_animation.mp4");
        ffmpeg::crop_video(
            settings,
            &options.animation,
            &cropped,
            options.crop_right,
            options.crop_bottom,
        )
        .await
        .context("Failed to crop animation")?
    } else {
        logi("Skipping cropping (no crop values specified)");
        options.animation.clone()
    };

    let looped = work.join("looped_animation.mp4");
    ffmpeg::loop_animation(settings, &animation, duration, &looped)
        .await
        .context("Failed to loop animation")?;

    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        init::ensure_directory(parent).await?;
    }
    logi("Combining video and audio");
    ffmpeg::mux_video_audio(settings, &looped, &stitched, &options.output)
        .await
        .context("Failed to combine video and audio")?;

    Ok((duration, tracks.len()))
}

/// `<dir>/<stem>_temp` next to the output file.
pub fn temp_copy_dir(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lofi_video".to_string());
    output.with_file_name(format!("{}_temp", stem))
}
