use crate::config::Settings;
use crate::ffmpeg;
use crate::planner::Assignment;
use crate::{logi, logok, logw};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One output path per assignment. Images sharing a stem (`a.jpg`, `a.png`)
/// get `a_video.mp4`, `a_2_video.mp4`, ... in plan order.
pub fn output_paths(assignments: &[Assignment], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    assignments
        .iter()
        .map(|assignment| {
            let stem = assignment.image.stem();
            let mut path = output_dir.join(format!("{}_video.mp4", stem));
            let mut n = 2;
            while !taken.insert(path.clone()) {
                path = output_dir.join(format!("{}_{}_video.mp4", stem, n));
                n += 1;
            }
            path
        })
        .collect()
}

/// Stitches the assignment's tracks into one audio file inside `work_dir`,
/// then renders the image over it to `out`. The audio stays in `work_dir`.
pub async fn render_assignment(
    settings: &Settings,
    index: usize,
    assignment: &Assignment,
    work_dir: &Path,
    out: &Path,
) -> Result<PathBuf> {
    let inputs: Vec<PathBuf> = assignment
        .tracks
        .iter()
        .map(|t| t.path().to_path_buf())
        .collect();
    let audio = work_dir.join(format!("audio_sequence_{}.m4a", index));

    logi(format!(
        "Stitching {} tracks ({:.1} min) for {}",
        inputs.len(),
        assignment.total_duration / 60.0,
        assignment.image.file_name()
    ));
    ffmpeg::concat_audio(settings, &inputs, &audio)
        .await
        .with_context(|| format!("Audio concat failed for {}", assignment.image.file_name()))?;

    logi(format!("Creating video: {}", out.display()));
    ffmpeg::render_image_video(settings, assignment.image.path(), &audio, out)
        .await
        .with_context(|| format!("Video render failed for {}", assignment.image.file_name()))
}

#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub rendered: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Renders every assignment with at most `settings.jobs` ffmpeg processes
/// running at once. Assignments never share tracks, so they are independent.
pub async fn render_all(
    settings: &Settings,
    assignments: &[Assignment],
    work_dir: &Path,
    output_dir: &Path,
) -> RenderOutcome {
    let settings = Arc::new(settings.clone());
    let permits = Arc::new(Semaphore::new(settings.jobs.max(1)));
    let mut set = JoinSet::new();

    let outputs = output_paths(assignments, output_dir);
    for (idx, (assignment, out)) in assignments.iter().cloned().zip(outputs).enumerate() {
        let settings = Arc::clone(&settings);
        let permits = Arc::clone(&permits);
        let work_dir = work_dir.to_path_buf();
        let total = assignments.len();

        set.spawn(async move {
            let _permit = permits.acquire_owned().await;
            logi(format!(
                "Processing image {}/{}: {}",
                idx + 1,
                total,
                assignment.image.file_name()
            ));
            let result =
                render_assignment(&settings, idx + 1, &assignment, &work_dir, &out).await;
            (idx, assignment.image.path().to_path_buf(), result)
        });
    }

    let mut results = Vec::with_capacity(assignments.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(entry) => results.push(entry),
            Err(err) => logw(format!("Render task aborted: {}", err)),
        }
    }
    results.sort_by_key(|(idx, _, _)| *idx);

    let mut outcome = RenderOutcome::default();
    for (_, image, result) in results {
        match result {
            Ok(path) => {
                logok(format!("Successfully created: {}", path.display()));
                outcome.rendered.push(path);
            }
            Err(err) => {
                logw(format!("Failed to create video for {}: {:#}", image.display(), err));
                outcome.failed.push((image, format!("{:#}", err)));
            }
        }
    }
    outcome
}
