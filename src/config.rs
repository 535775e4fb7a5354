use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,
    /// Frame rate of the still-image input.
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    /// Maximum concurrent renders.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_pixel_format() -> String {
    "yuv420p".to_string()
}

fn default_framerate() -> u32 {
    1
}

fn default_jobs() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
            audio_bitrate: default_audio_bitrate(),
            video_codec: default_video_codec(),
            pixel_format: default_pixel_format(),
            framerate: default_framerate(),
            jobs: default_jobs(),
        }
    }
}

impl Settings {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config: {}", path.as_ref().display()))
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p).await,
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg.trim().is_empty() {
            anyhow::bail!("config: ffmpeg path is empty");
        }
        if self.ffprobe.trim().is_empty() {
            anyhow::bail!("config: ffprobe path is empty");
        }
        if self.audio_bitrate.trim().is_empty() {
            anyhow::bail!("config: audio_bitrate is empty");
        }
        if self.framerate == 0 {
            anyhow::bail!("config: framerate must be at least 1");
        }
        if self.jobs == 0 {
            anyhow::bail!("config: jobs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.audio_bitrate, "192k");
        assert_eq!(settings.jobs, 1);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let settings =
            Settings::from_json(r#"{ "audio_bitrate": "256k", "jobs": 4, "ffmpeg": "/opt/ff/ffmpeg" }"#)
                .unwrap();
        assert_eq!(settings.audio_bitrate, "256k");
        assert_eq!(settings.jobs, 4);
        assert_eq!(settings.ffmpeg, "/opt/ff/ffmpeg");
        assert_eq!(settings.ffprobe, "ffprobe");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Settings::from_json(r#"{ "jobs": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "framerate": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "audio_bitrate": " " }"#).is_err());
        assert!(Settings::from_json("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lofi.json");
        tokio::fs::write(&path, r#"{ "framerate": 2 }"#).await.unwrap();

        let settings = Settings::load_or_default(Some(path.as_path())).await.unwrap();
        assert_eq!(settings.framerate, 2);

        let missing = dir.path().join("missing.json");
        assert!(Settings::load(&missing).await.is_err());
        assert_eq!(Settings::load_or_default(None).await.unwrap(), Settings::default());
    }
}
