use crate::config::Settings;
use crate::error::MediaError;
use crate::{logi, logw};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

async fn run_cmd(args: &[String]) -> Result<(), MediaError> {
    let Some((program, rest)) = args.split_first() else {
        return Ok(());
    };

    tracing::debug!("running: {}", args.join(" "));
    let output = Command::new(program)
        .args(rest)
        .output()
        .await
        .map_err(|source| MediaError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(MediaError::Command {
            program: program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

async fn run_to_file(args: &[String], out: &Path) -> Result<PathBuf, MediaError> {
    run_cmd(args).await?;
    if !out.exists() {
        return Err(MediaError::MissingOutput {
            program: args.first().cloned().unwrap_or_default(),
            path: out.to_path_buf(),
        });
    }
    Ok(out.to_path_buf())
}

fn base_args(settings: &Settings) -> Vec<String> {
    vec![
        settings.ffmpeg.clone(),
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ]
}

/// `[0:a][1:a]...concat=n=N:v=0:a=1[a]`
pub fn concat_filter(inputs: usize) -> String {
    let mut filter = String::new();
    for i in 0..inputs {
        filter.push_str(&format!("[{}:a]", i));
    }
    filter.push_str(&format!("concat=n={}:v=0:a=1[a]", inputs));
    filter
}

pub fn concat_audio_args(settings: &Settings, inputs: &[PathBuf], out: &Path) -> Vec<String> {
    let mut args = base_args(settings);
    for input in inputs {
        args.push("-i".to_string());
        args.push(input.display().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        concat_filter(inputs.len()),
        "-map".to_string(),
        "[a]".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        settings.audio_bitrate.clone(),
        out.display().to_string(),
    ]);
    args
}

pub fn image_video_args(settings: &Settings, image: &Path, audio: &Path, out: &Path) -> Vec<String> {
    let mut args = base_args(settings);
    args.extend([
        "-loop".to_string(),
        "1".to_string(),
        "-framerate".to_string(),
        settings.framerate.to_string(),
        "-i".to_string(),
        image.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-pix_fmt".to_string(),
        settings.pixel_format.clone(),
        // odd image sizes break yuv420p
        "-vf".to_string(),
        "scale=trunc(iw/2)*2:trunc(ih/2)*2".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        settings.audio_bitrate.clone(),
        "-shortest".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        out.display().to_string(),
    ]);
    args
}

pub fn crop_args(settings: &Settings, input: &Path, out: &Path, width: u32, height: u32) -> Vec<String> {
    let mut args = base_args(settings);
    args.extend([
        "-i".to_string(),
        input.display().to_string(),
        "-vf".to_string(),
        format!("crop={}:{}:0:0", width, height),
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-crf".to_string(),
        "18".to_string(),
        "-preset".to_string(),
        "veryfast".to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        out.display().to_string(),
    ]);
    args
}

fn loop_seconds(duration: f64) -> String {
    // round up so the looped video never cuts the audio short
    format!("{}", duration.max(1.0).ceil() as u64)
}

pub fn loop_copy_args(settings: &Settings, animation: &Path, duration: f64, out: &Path) -> Vec<String> {
    let mut args = base_args(settings);
    args.extend([
        "-stream_loop".to_string(),
        "-1".to_string(),
        "-i".to_string(),
        animation.display().to_string(),
        "-t".to_string(),
        loop_seconds(duration),
        "-c:v".to_string(),
        "copy".to_string(),
        "-an".to_string(),
        out.display().to_string(),
    ]);
    args
}

pub fn loop_encode_args(settings: &Settings, animation: &Path, duration: f64, out: &Path) -> Vec<String> {
    let mut args = base_args(settings);
    args.extend([
        "-stream_loop".to_string(),
        "-1".to_string(),
        "-i".to_string(),
        animation.display().to_string(),
        "-t".to_string(),
        loop_seconds(duration),
        "-c:v".to_string(),
        settings.video_codec.clone(),
        "-preset".to_string(),
        "fast".to_string(),
        "-crf".to_string(),
        "20".to_string(),
        "-pix_fmt".to_string(),
        settings.pixel_format.clone(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        "-an".to_string(),
        out.display().to_string(),
    ]);
    args
}

pub fn mux_args(settings: &Settings, video: &Path, audio: &Path, out: &Path) -> Vec<String> {
    let mut args = base_args(settings);
    args.extend([
        "-i".to_string(),
        video.display().to_string(),
        "-i".to_string(),
        audio.display().to_string(),
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        settings.audio_bitrate.clone(),
        "-shortest".to_string(),
        out.display().to_string(),
    ]);
    args
}

pub async fn concat_audio(settings: &Settings, inputs: &[PathBuf], out: &Path) -> Result<PathBuf, MediaError> {
    run_to_file(&concat_audio_args(settings, inputs, out), out).await
}

pub async fn render_image_video(
    settings: &Settings,
    image: &Path,
    audio: &Path,
    out: &Path,
) -> Result<PathBuf, MediaError> {
    run_to_file(&image_video_args(settings, image, audio, out), out).await
}

pub async fn mux_video_audio(
    settings: &Settings,
    video: &Path,
    audio: &Path,
    out: &Path,
) -> Result<PathBuf, MediaError> {
    run_to_file(&mux_args(settings, video, audio, out), out).await
}

/// Removes `crop_right`/`crop_bottom` pixels from the right and bottom edges.
pub async fn crop_video(
    settings: &Settings,
    input: &Path,
    out: &Path,
    crop_right: u32,
    crop_bottom: u32,
) -> Result<PathBuf> {
    let (w, h) = probe_dimensions(settings, input).await?;
    if crop_right >= w || crop_bottom >= h {
        anyhow::bail!(
            "crop {}x{} is larger than the {}x{} input {}",
            crop_right,
            crop_bottom,
            w,
            h,
            input.display()
        );
    }
    // libx264 wants even dimensions
    let new_w = (w - crop_right) & !1;
    let new_h = (h - crop_bottom) & !1;
    logi(format!(
        "Cropping {}px right, {}px bottom: {}x{} -> {}x{}",
        crop_right, crop_bottom, w, h, new_w, new_h
    ));

    Ok(run_to_file(&crop_args(settings, input, out, new_w, new_h), out).await?)
}

/// Loops `animation` for `duration` seconds. MP4 inputs try a stream copy
/// first and fall back to re-encoding.
pub async fn loop_animation(
    settings: &Settings,
    animation: &Path,
    duration: f64,
    out: &Path,
) -> Result<PathBuf, MediaError> {
    let is_mp4 = animation
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("mp4"))
        .unwrap_or(false);

    if is_mp4 {
        logi(format!("Looping MP4 animation for {} seconds (stream copy)", loop_seconds(duration)));
        match run_to_file(&loop_copy_args(settings, animation, duration, out), out).await {
            Ok(path) => return Ok(path),
            Err(err) => logw(format!("Stream copy failed, falling back to re-encoding: {}", err)),
        }
    }

    logi(format!("Looping animation for {} seconds (re-encode)", loop_seconds(duration)));
    run_to_file(&loop_encode_args(settings, animation, duration, out), out).await
}

#[derive(Debug, Deserialize)]
struct StreamsOutput {
    #[serde(default)]
    streams: Vec<StreamDims>,
}

#[derive(Debug, Deserialize)]
struct StreamDims {
    width: Option<u32>,
    height: Option<u32>,
}

pub fn parse_dimensions_json(text: &str) -> Result<(u32, u32)> {
    let parsed: StreamsOutput = serde_json::from_str(text).context("Invalid ffprobe JSON")?;
    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| anyhow::anyhow!("No video stream"))?;
    match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(anyhow::anyhow!("Invalid dimensions")),
    }
}

pub async fn probe_dimensions(settings: &Settings, path: &Path) -> Result<(u32, u32)> {
    let output = Command::new(&settings.ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .await
        .context("ffprobe execution failed")?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "ffprobe failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    parse_dimensions_json(&String::from_utf8_lossy(&output.stdout))
}
