use crate::config::Settings;
use crate::error::SetupError;
use crate::logi;
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

pub async fn ensure_directory(dir: &Path) -> Result<(), SetupError> {
    if !dir.exists() {
        fs::create_dir_all(dir).await?;
        logi(format!("Created directory: {}", dir.display()));
    }
    Ok(())
}

pub fn require_folder(dir: &Path) -> Result<(), SetupError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(SetupError::MissingFolder(dir.to_path_buf()))
    }
}

async fn tool_works(program: &str) -> bool {
    match tokio::process::Command::new(program)
        .arg("-version")
        .output()
        .await
    {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Both ffmpeg and ffprobe must answer `-version`.
pub async fn check_tools(settings: &Settings) -> Result<(), SetupError> {
    let mut missing = Vec::new();
    for program in [&settings.ffmpeg, &settings.ffprobe] {
        if !tool_works(program).await {
            missing.push(program.as_str());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SetupError::MissingTool(missing.join(", ")))
    }
}

/// Copies the contents of `src` into `dest`, creating `dest` as needed.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<(), SetupError> {
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    std::fs::create_dir_all(dest)?;
    Ok(())
}
