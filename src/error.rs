use std::path::PathBuf;
use thiserror::Error;

/// Structural precondition violations raised by the planner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("target duration must be a positive number of seconds, got {0}")]
    InvalidTarget(f64),
}

/// A single file's duration could not be determined.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to launch ffprobe: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffprobe exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ffprobe reported no usable duration ({0})")]
    InvalidDuration(String),
}

/// Fatal problems detected before any planning happens.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("folder does not exist: {}", .0.display())]
    MissingFolder(PathBuf),

    #[error("required tool not found or not working: {0} (install ffmpeg: https://ffmpeg.org/download.html)")]
    MissingTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Failures of media construction or of an ffmpeg invocation.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("invalid duration for {}: {}", .path.display(), .seconds)]
    InvalidDuration { path: PathBuf, seconds: f64 },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{} reported success but {} was not written", .program, .path.display())]
    MissingOutput { program: String, path: PathBuf },
}
