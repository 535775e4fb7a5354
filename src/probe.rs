use crate::error::ProbeError;
use crate::logw;
use crate::media::AudioTrack;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Determines a media file's duration without decoding it.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<f64, ProbeError>;
}

pub struct FfprobeProbe {
    program: String,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl DurationProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_duration_json(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Extracts `format.duration` from `ffprobe -of json` output.
pub fn parse_duration_json(text: &str) -> Result<f64, ProbeError> {
    let parsed: ProbeOutput = serde_json::from_str(text)?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| ProbeError::InvalidDuration("missing format.duration".to_string()))?;

    let seconds = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ProbeError::InvalidDuration(raw.clone()))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ProbeError::InvalidDuration(raw));
    }
    Ok(seconds)
}

#[derive(Debug, Default)]
pub struct ProbeReport {
    pub tracks: Vec<AudioTrack>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Probes every path once, in order. Files that cannot be probed are
/// reported and left out; they never abort the run.
pub async fn probe_tracks(probe: &dyn DurationProbe, paths: &[PathBuf]) -> ProbeReport {
    let mut report = ProbeReport::default();

    for path in paths {
        let result = probe
            .probe(path)
            .await
            .map_err(|e| e.to_string())
            .and_then(|secs| AudioTrack::new(path.clone(), secs).map_err(|e| e.to_string()));

        match result {
            Ok(track) => report.tracks.push(track),
            Err(why) => {
                logw(format!("Could not get duration for {}: {}", path.display(), why));
                report.failures.push((path.clone(), why));
            }
        }
    }

    report
}
