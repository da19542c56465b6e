//! Run artifacts: failure screenshots on disk.
//!
//! Screenshot files are named `<label>_<timestamp>.png` with the label
//! sanitized for the filesystem. Names are collision-free within a run,
//! so two failures of identically titled scenarios keep both captures.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use crate::result::EnsayoResult;

/// Replace anything that does not belong in a file name with `_`
#[must_use]
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn timestamp() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
        .replace([':', '.'], "-")
}

/// File name for a screenshot artifact, from a raw label
#[must_use]
pub fn screenshot_file_name(label: &str) -> String {
    format!("{}_{}.png", sanitize_label(label), timestamp())
}

/// Write a screenshot under `dir`, creating the directory if needed.
///
/// Returns the path actually written. An existing file with the same
/// name (same label within one timestamp tick) gets a numeric suffix
/// instead of being overwritten.
pub fn write_screenshot(dir: &Path, label: &str, bytes: &[u8]) -> EnsayoResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let base = format!("{}_{}", sanitize_label(label), timestamp());
    let mut path = dir.join(format!("{base}.png"));
    let mut suffix = 1u32;
    while path.exists() {
        path = dir.join(format!("{base}_{suffix}.png"));
        suffix += 1;
    }
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "screenshot written");
    Ok(path)
}
