pub mod animate;
pub mod batch;
pub mod cli;
pub mod config;
pub mod durations;
pub mod error;
pub mod ffmpeg;
pub mod init;
pub mod media;
pub mod planner;
pub mod platform;
pub mod probe;
pub mod render;
pub mod scan;

pub(crate) fn logv(tag: &str, message: &str) {
    match tag {
        "WARN" => tracing::warn!("[{}] {}", tag, message),
        _ => tracing::info!("[{}] {}", tag, message),
    }
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}
