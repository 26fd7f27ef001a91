use super::{OutputOptions, RANK, Ranking, RunSummary, emit};
use crate::error::{KeyrankError, Result};
use crate::storage::{KEYWORD_MARKER, read_csv};
use crate::table::Table;
use chrono::NaiveDateTime;
use keyrank_engine::engine::{
    CellValue, ColumnSpec, HeaderMatch, Ranked, RowFilter, ScoredRow, ScoringConfig,
    derived_columns, keyword_columns, passes_all, rank_by, resolve, score_row, unresolved_filter,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parameters of a keyword scoring run, fixed for its whole duration.
#[derive(Clone, Debug, PartialEq)]
pub struct KeywordRun {
    pub scoring: ScoringConfig,
    pub columns: Vec<ColumnSpec>,
    pub header_match: HeaderMatch,
    pub filters: Vec<RowFilter>,
    pub top_n: Option<usize>,
    pub output: OutputOptions,
}

impl Default for KeywordRun {
    fn default() -> Self {
        KeywordRun {
            scoring: ScoringConfig::default(),
            columns: keyword_columns(),
            header_match: HeaderMatch::default(),
            filters: Vec::new(),
            top_n: None,
            output: OutputOptions::new(KEYWORD_MARKER),
        }
    }
}

/// Score, filter and rank every row of `table`.
///
/// The result keeps all source columns (padded to a common width) and
/// appends the derived score columns followed by `rank`.
pub fn rank_keywords(table: &Table, run: &KeywordRun) -> Result<Ranking> {
    let columns = resolve(&table.header, &run.columns, run.header_match)?;
    for (field, idx) in columns.iter() {
        debug!(field, column = idx, header = %table.header[idx].escape_debug(), "resolved column");
    }
    if let Some(filter) = unresolved_filter(&run.filters, &columns) {
        return Err(KeyrankError::UnknownFilterField {
            field: filter.field.clone(),
        });
    }

    let width = table.width();
    let mut rows_filtered = 0;
    let mut coerced_cells = 0;
    let mut scored: Vec<ScoredRow> = Vec::with_capacity(table.row_count());
    for idx in 0..table.row_count() {
        let row = table.padded_row(idx, width);
        if !passes_all(&row, &run.filters, &columns) {
            rows_filtered += 1;
            continue;
        }
        let row = score_row(idx, &row, &columns, &run.scoring);
        coerced_cells += row.coerced_cells;
        scored.push(row);
    }

    let mut header = table.header.clone();
    header.resize(width, String::new());
    header.extend(derived_columns(&columns, &run.scoring));
    header.push(RANK.to_string());

    let mut out = Table::new(header);
    for Ranked { rank, item } in rank_by(scored, run.top_n, ScoredRow::final_score) {
        let mut cells = item.cells;
        cells.extend(item.derived.into_iter().map(|(_, v)| CellValue::Number(v)));
        cells.push(CellValue::Number(rank as f64));
        out.push_row(cells);
    }

    Ok(Ranking {
        table: out,
        rows_read: table.row_count(),
        rows_filtered,
        coerced_cells,
    })
}

/// Read `source`, rank it and write the result to a new file.
pub fn run_keywords(source: &Path, run: &KeywordRun, now: NaiveDateTime) -> Result<RunSummary> {
    info!(source = %source.display(), top_n = ?run.top_n, "ranking keywords");
    let table = read_csv(source)?;
    let ranking = rank_keywords(&table, run)?;
    if ranking.coerced_cells > 0 {
        warn!(
            source = %source.display(),
            cells = ranking.coerced_cells,
            "non-numeric values were scored as 0"
        );
    }
    let summary = emit(source, ranking, &run.output, now)?;
    info!(
        output = %summary.output.display(),
        rows = summary.rows_written,
        filtered = summary.rows_filtered,
        "saved ranking"
    );
    Ok(summary)
}
