use super::{OutputOptions, RANK, Ranking, RunSummary, emit};
use crate::error::{KeyrankError, Result};
use crate::storage::{GROWTH_MARKER, read_csv};
use crate::table::Table;
use chrono::NaiveDateTime;
use keyrank_engine::engine::{
    CellValue, DEFAULT_RECENT_COUNT, GROWTH_COLUMNS, GrowthScore, HeaderMatch, Ranked,
    date_columns, find_category_columns, rank_by, score_growth,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parameters of a category growth run.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthRun {
    /// How many of the newest date columns count as "recent".
    pub recent_count: usize,
    pub top_n: Option<usize>,
    pub header_match: HeaderMatch,
    pub output: OutputOptions,
}

impl Default for GrowthRun {
    fn default() -> Self {
        GrowthRun {
            recent_count: DEFAULT_RECENT_COUNT,
            top_n: None,
            header_match: HeaderMatch::default(),
            output: OutputOptions::new(GROWTH_MARKER),
        }
    }
}

/// Rank category rows by growth rate.
///
/// Output columns: `rank`, the category columns present in the source, then
/// `total`, `recent_sum`, `older_sum`, `growth_rate`, `final_score`.
pub fn rank_growth(table: &Table, run: &GrowthRun) -> Result<Ranking> {
    let dates = date_columns(&table.header);
    if dates.is_empty() {
        return Err(KeyrankError::NoDateColumns);
    }
    let categories = find_category_columns(&table.header, run.header_match);
    if categories.is_empty() {
        return Err(KeyrankError::MissingColumn {
            field: "category".to_string(),
        });
    }
    debug!(
        dates = dates.len(),
        categories = categories.len(),
        recent = run.recent_count,
        "resolved growth columns"
    );

    let mut coerced_cells = 0;
    let mut scored: Vec<(usize, GrowthScore)> = Vec::with_capacity(table.row_count());
    for (idx, row) in table.rows.iter().enumerate() {
        coerced_cells += dates
            .iter()
            .filter(|&&col| {
                let cell = table.cell(idx, col);
                !cell.is_empty() && cell.as_number().is_none()
            })
            .count();
        scored.push((idx, score_growth(row, &dates, run.recent_count)));
    }

    let mut header = vec![RANK.to_string()];
    header.extend(categories.iter().map(|(name, _)| name.clone()));
    header.extend(GROWTH_COLUMNS.iter().map(|c| c.to_string()));

    let mut out = Table::new(header);
    for Ranked { rank, item } in rank_by(scored, run.top_n, |(_, score)| score.growth_rate) {
        let (idx, score) = item;
        let mut cells = vec![CellValue::Number(rank as f64)];
        cells.extend(
            categories
                .iter()
                .map(|(_, col)| table.cell(idx, *col).clone()),
        );
        cells.extend(score.values().into_iter().map(CellValue::Number));
        out.push_row(cells);
    }

    Ok(Ranking {
        table: out,
        rows_read: table.row_count(),
        rows_filtered: 0,
        coerced_cells,
    })
}

/// Read `source`, rank categories by growth and write the result.
pub fn run_growth(source: &Path, run: &GrowthRun, now: NaiveDateTime) -> Result<RunSummary> {
    info!(source = %source.display(), recent = run.recent_count, "ranking category growth");
    let table = read_csv(source)?;
    let ranking = rank_growth(&table, run)?;
    if ranking.coerced_cells > 0 {
        warn!(
            source = %source.display(),
            cells = ranking.coerced_cells,
            "non-numeric values in date columns were skipped"
        );
    }
    let summary = emit(source, ranking, &run.output, now)?;
    info!(output = %summary.output.display(), rows = summary.rows_written, "saved ranking");
    Ok(summary)
}
