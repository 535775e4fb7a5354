use crate::error::SetupError;
use crate::media::{ImageAsset, MediaKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the files directly inside `dir` whose extension is on the
/// allow-list for `kind`, sorted by path.
pub fn scan_folder(dir: &Path, kind: MediaKind) -> Result<Vec<PathBuf>, SetupError> {
    if !dir.is_dir() {
        return Err(SetupError::MissingFolder(dir.to_path_buf()));
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if kind.matches(entry.path()) {
            out.push(entry.into_path());
        }
    }

    out.sort();
    Ok(out)
}

pub fn scan_images(dir: &Path) -> Result<Vec<ImageAsset>, SetupError> {
    Ok(scan_folder(dir, MediaKind::Image)?
        .into_iter()
        .map(ImageAsset::new)
        .collect())
}
