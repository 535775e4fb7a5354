use crate::media::{MediaKind, format_duration};
use crate::probe::DurationProbe;
use crate::scan;
use crate::logw;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct DurationEntry {
    pub path: PathBuf,
    /// `None` when the file could not be probed.
    pub seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DurationReport {
    pub entries: Vec<DurationEntry>,
    pub total_seconds: f64,
    pub probed: usize,
}

impl DurationReport {
    pub fn failed(&self) -> usize {
        self.entries.len() - self.probed
    }

    pub fn average_seconds(&self) -> f64 {
        if self.probed == 0 {
            0.0
        } else {
            self.total_seconds / self.probed as f64
        }
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(60);
        let _ = writeln!(out, "{}", rule);
        for entry in &self.entries {
            let name = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let shown = entry
                .seconds
                .map(format_duration)
                .unwrap_or_else(|| "ERROR".to_string());
            let _ = writeln!(out, "{:<50} {}", name, shown);
        }
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Successfully processed: {} files", self.probed);
        if self.failed() > 0 {
            let _ = writeln!(out, "Failed: {} files", self.failed());
        }
        let _ = writeln!(out, "Total duration: {}", format_duration(self.total_seconds));
        let _ = writeln!(out, "Average duration: {}", format_duration(self.average_seconds()));
        out
    }
}

/// Probes every audio file in `dir` and totals the durations.
pub async fn summarize_folder(probe: &dyn DurationProbe, dir: &Path) -> Result<DurationReport> {
    let paths = scan::scan_folder(dir, MediaKind::Audio)?;
    let mut report = DurationReport::default();

    for path in paths {
        let seconds = match probe.probe(&path).await {
            Ok(secs) => {
                report.total_seconds += secs;
                report.probed += 1;
                Some(secs)
            }
            Err(err) => {
                logw(format!("Error reading {}: {}", path.display(), err));
                None
            }
        };
        report.entries.push(DurationEntry { path, seconds });
    }

    Ok(report)
}
