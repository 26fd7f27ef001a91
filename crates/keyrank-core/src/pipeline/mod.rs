//! End-to-end ranking runs: read a table, score, rank, write a new file.
//!
//! A run either completes and writes exactly one output, or fails before
//! anything is written. The source file is never modified.

mod growth;
mod keyword;

pub use growth::{GrowthRun, rank_growth, run_growth};
pub use keyword::{KeywordRun, rank_keywords, run_keywords};

use crate::error::Result;
use crate::storage::{OutputFormat, output_path, write_table};
use crate::table::Table;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub const RANK: &str = "rank";

/// Where and how a run writes its result.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputOptions {
    pub marker: String,
    pub format: OutputFormat,
    /// Defaults to the source file's directory.
    pub out_dir: Option<PathBuf>,
}

impl OutputOptions {
    pub fn new(marker: &str) -> Self {
        OutputOptions {
            marker: marker.to_string(),
            format: OutputFormat::default(),
            out_dir: None,
        }
    }
}

/// A ranked table plus the counters collected while building it.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub table: Table,
    pub rows_read: usize,
    /// Rows dropped by filters.
    pub rows_filtered: usize,
    /// Non-empty cells that were read as `0.0`.
    pub coerced_cells: usize,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_filtered: usize,
    pub rows_written: usize,
    pub coerced_cells: usize,
}

/// Write a finished ranking next to `source` and summarize it.
pub(crate) fn emit(
    source: &Path,
    ranking: Ranking,
    output: &OutputOptions,
    now: NaiveDateTime,
) -> Result<RunSummary> {
    let preferred = output_path(
        source,
        output.out_dir.as_deref(),
        &output.marker,
        output.format.extension(),
        now,
    );
    let title = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let written = write_table(&ranking.table, &preferred, output.format, &title)?;

    Ok(RunSummary {
        source: source.to_path_buf(),
        output: written,
        rows_read: ranking.rows_read,
        rows_filtered: ranking.rows_filtered,
        rows_written: ranking.table.row_count(),
        coerced_cells: ranking.coerced_cells,
    })
}
