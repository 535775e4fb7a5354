use crate::error::MediaError;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        }
    }

    /// Case-insensitive extension match against the allow-list.
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| self.extensions().iter().any(|want| ext.eq_ignore_ascii_case(want)))
            .unwrap_or(false)
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }
}

/// An audio file with a probed, strictly positive duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    path: PathBuf,
    #[serde(rename = "duration_seconds")]
    duration: f64,
}

impl AudioTrack {
    pub fn new(path: impl Into<PathBuf>, seconds: f64) -> Result<Self, MediaError> {
        let path = path.into();
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(MediaError::InvalidDuration { path, seconds });
        }
        Ok(Self {
            path,
            duration: seconds,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn file_name(&self) -> String {
        file_name_lossy(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    path: PathBuf,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .unwrap_or_else(|| file_name_lossy(&self.path))
    }

    pub fn file_name(&self) -> String {
        file_name_lossy(&self.path)
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `H:MM:SS` once past an hour, `M:SS` below that.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert!(MediaKind::Image.matches(Path::new("cover.JPG")));
        assert!(MediaKind::Image.matches(Path::new("dir/scene.WebP")));
        assert!(MediaKind::Audio.matches(Path::new("song.Flac")));
        assert!(!MediaKind::Audio.matches(Path::new("cover.png")));
        assert!(!MediaKind::Image.matches(Path::new("README")));
        assert!(!MediaKind::Audio.matches(Path::new("track.mp3.part")));
    }

    #[test]
    fn track_rejects_bad_durations() {
        assert!(AudioTrack::new("a.mp3", 0.0).is_err());
        assert!(AudioTrack::new("a.mp3", -3.0).is_err());
        assert!(AudioTrack::new("a.mp3", f64::NAN).is_err());
        assert!(AudioTrack::new("a.mp3", f64::INFINITY).is_err());

        let track = AudioTrack::new("dir/a.mp3", 12.5).unwrap();
        assert_eq!(track.duration(), 12.5);
        assert_eq!(track.file_name(), "a.mp3");
    }

    #[test]
    fn image_stem_drops_extension() {
        let image = ImageAsset::new("art/sunset.beach.png");
        assert_eq!(image.stem(), "sunset.beach");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(185.0), "3:05");
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(7384.2), "2:03:04");
        assert_eq!(format_duration(-5.0), "0:00");
    }
}
