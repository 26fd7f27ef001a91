//! Output file naming.
//!
//! Outputs sit next to their source (or in an explicit directory) and are
//! named `{stem}_{YYYY-MM-DD_HHMM}_{marker}.{ext}`. When that name is taken a
//! counter is appended to the stem part: `..._{marker}_2.{ext}`.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub const KEYWORD_MARKER: &str = "키워드선별결과";
pub const GROWTH_MARKER: &str = "growthRanked";

/// The preferred output path for `source`.
pub fn output_path(
    source: &Path,
    out_dir: Option<&Path>,
    marker: &str,
    ext: &str,
    now: NaiveDateTime,
) -> PathBuf {
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());
    let marker = sanitize_marker(marker);
    let stamp = now.format("%Y-%m-%d_%H%M");
    let name = if marker.is_empty() {
        format!("{}_{}.{}", stem, stamp, ext)
    } else {
        format!("{}_{}_{}.{}", stem, stamp, marker, ext)
    };
    dir.join(name)
}

/// The `attempt`-th candidate for `preferred`: attempt 1 is `preferred`
/// itself, later attempts append `_{attempt}` before the extension.
pub fn numbered(preferred: &Path, attempt: usize) -> PathBuf {
    if attempt <= 1 {
        return preferred.to_path_buf();
    }
    let stem = preferred
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match preferred.extension() {
        Some(ext) => format!("{}_{}.{}", stem, attempt, ext.to_string_lossy()),
        None => format!("{}_{}", stem, attempt),
    };
    preferred.with_file_name(name)
}

/// Markers end up in file names; path separators are replaced.
fn sanitize_marker(marker: &str) -> String {
    marker
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
