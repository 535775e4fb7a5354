use crate::config::Settings;
use crate::init;
use crate::media::MediaKind;
use crate::planner::{self, Plan, PlanSummary};
use crate::probe::{self, DurationProbe, FfprobeProbe};
use crate::render;
use crate::scan;
use crate::{logi, logok, logw};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Rough track length used for the up-front supply warning.
const ESTIMATED_TRACK_SECONDS: u64 = 180;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub image_folder: PathBuf,
    pub audio_folder: PathBuf,
    pub target_minutes: u32,
    pub output_folder: PathBuf,
    pub keep_temp: bool,
    pub dry_run: bool,
}

impl BatchOptions {
    pub fn target_seconds(&self) -> f64 {
        f64::from(self.target_minutes) * 60.0
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub plan: Plan,
    pub probe_failures: Vec<(PathBuf, String)>,
    pub rendered: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn summary(&self) -> PlanSummary {
        self.plan.summary()
    }
}

/// Estimated number of tracks the run needs, assuming ~3 minute songs.
pub fn estimated_tracks_needed(images: usize, target_seconds: u64) -> u64 {
    images as u64 * (target_seconds / ESTIMATED_TRACK_SECONDS).max(1)
}

pub async fn run_batch(options: &BatchOptions, settings: &Settings) -> Result<BatchReport> {
    init::require_folder(&options.image_folder)?;
    init::require_folder(&options.audio_folder)?;
    init::check_tools(settings).await?;

    let probe = FfprobeProbe::new(settings.ffprobe.clone());
    run_batch_with(options, settings, &probe).await
}

/// The batch workflow with an explicit duration probe.
pub async fn run_batch_with(
    options: &BatchOptions,
    settings: &Settings,
    probe: &dyn DurationProbe,
) -> Result<BatchReport> {
    let images = scan::scan_images(&options.image_folder)?;
    let audio_paths = scan::scan_folder(&options.audio_folder, MediaKind::Audio)?;
    init::ensure_directory(&options.output_folder).await?;

    if images.is_empty() {
        logw(format!("No supported image files found in {}", options.image_folder.display()));
    }
    if audio_paths.is_empty() {
        logw(format!("No supported audio files found in {}", options.audio_folder.display()));
    }
    logi(format!("Found {} images and {} audio files", images.len(), audio_paths.len()));
    logi(format!("Creating videos with {} minutes duration each", options.target_minutes));

    let needed = estimated_tracks_needed(images.len(), u64::from(options.target_minutes) * 60);
    if needed > audio_paths.len() as u64 {
        logw(format!(
            "May not have enough unique songs for all videos (estimated {}, available {})",
            needed,
            audio_paths.len()
        ));
    }

    let probed = probe::probe_tracks(probe, &audio_paths).await;
    if !probed.failures.is_empty() {
        logw(format!("{} audio files skipped (duration unknown)", probed.failures.len()));
    }

    let plan = planner::plan(&images, &probed.tracks, options.target_seconds())?;
    log_plan(&plan);

    let mut report = BatchReport {
        plan,
        probe_failures: probed.failures,
        ..BatchReport::default()
    };

    if options.dry_run || report.plan.assignments.is_empty() {
        return Ok(report);
    }

    let work = tempfile::Builder::new()
        .prefix("lofi-batch-")
        .tempdir()
        .context("Failed to create temp directory")?;

    let outcome = render::render_all(
        settings,
        &report.plan.assignments,
        work.path(),
        &options.output_folder,
    )
    .await;
    report.rendered = outcome.rendered;
    report.failed = outcome.failed;

    if options.keep_temp {
        let debug_dir = options.output_folder.join("batch_temp");
        init::copy_tree(work.path(), &debug_dir)?;
        logi(format!("Temporary files saved to: {}", debug_dir.display()));
    }

    logok(format!(
        "Process complete! Successfully created {}/{} videos",
        report.rendered.len(),
        images.len()
    ));
    logi(format!("Output folder: {}", options.output_folder.display()));
    Ok(report)
}

fn log_plan(plan: &Plan) {
    for (idx, a) in plan.assignments.iter().enumerate() {
        logi(format!(
            "Plan {}: {} <- {} tracks ({:.1} min)",
            idx + 1,
            a.image.file_name(),
            a.tracks.len(),
            a.total_duration / 60.0
        ));
    }

    let summary = plan.summary();
    if plan.is_short_of_audio() {
        logw(format!(
            "Not enough audio for every image: {} images left without a video",
            summary.skipped_images
        ));
    }
    logi(format!(
        "Planned {} videos, {} images skipped, {} tracks left over ({:.1} min)",
        summary.fulfilled,
        summary.skipped_images,
        summary.leftover_tracks,
        summary.leftover_seconds / 60.0
    ));
}
