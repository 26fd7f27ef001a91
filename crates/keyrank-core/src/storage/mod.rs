//! Storage module for CSV input, CSV/Markdown output and output naming

mod csv;
mod md;
mod naming;

pub use csv::{read_csv, read_csv_from, write_csv_to};
pub use md::write_markdown_to;
pub use naming::{GROWTH_MARKER, KEYWORD_MARKER, numbered, output_path};

use crate::error::{KeyrankError, Result};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Give up after this many taken names.
const MAX_NAME_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    #[serde(alias = "md")]
    Markdown,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
        }
    }

    pub fn write<W: Write>(self, out: W, table: &Table, title: &str) -> Result<()> {
        match self {
            OutputFormat::Csv => write_csv_to(out, table),
            OutputFormat::Markdown => write_markdown_to(out, table, title),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown format '{}' (expected csv or md)", other)),
        }
    }
}

/// Write `table` to `preferred` (or the first free numbered variant).
///
/// The content goes to a temporary file in the destination directory and is
/// moved into place only once fully written, so a failed run leaves nothing
/// behind. Existing files are never replaced. Returns the path written.
pub fn write_table(
    table: &Table,
    preferred: &Path,
    format: OutputFormat,
    title: &str,
) -> Result<PathBuf> {
    let dir = preferred
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".keyrank-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        format.write(&mut out, table, title)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;

    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let candidate = numbered(preferred, attempt);
        if candidate.exists() {
            debug!(path = %candidate.display(), "output name taken");
            continue;
        }
        match tmp.persist_noclobber(&candidate) {
            Ok(_) => {
                if attempt > 1 {
                    warn!(
                        preferred = %preferred.display(),
                        path = %candidate.display(),
                        "output name was taken, wrote numbered variant"
                    );
                }
                return Ok(candidate);
            }
            Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                tmp = err.file;
            }
            Err(err) => return Err(KeyrankError::Io(err.error)),
        }
    }

    Err(KeyrankError::OutputNameExhausted(preferred.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrank_engine::engine::CellValue;

    fn sample() -> Table {
        Table::with_rows(
            vec!["k".to_string(), "score".to_string()],
            vec![vec![CellValue::new_text("a"), CellValue::Number(2.0)]],
        )
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_write_table_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let written = write_table(&sample(), &target, OutputFormat::Csv, "t").unwrap();
        assert_eq!(written, target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "k,score\na,2\n");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_write_table_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        std::fs::write(&target, "original").unwrap();

        let written = write_table(&sample(), &target, OutputFormat::Csv, "t").unwrap();
        assert_eq!(written, dir.path().join("out_2.csv"));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn test_write_table_missing_dir_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            write_table(&sample(), &target, OutputFormat::Csv, "t"),
            Err(KeyrankError::Io(_))
        ));
        assert!(!target.exists());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
