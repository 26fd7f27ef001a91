//! Scoring engine API.
//!
//! This module provides the pure computation behind a ranking run:
//!
//! - [`CellValue`], [`coerce`] - Cell storage and lenient numeric coercion
//! - [`resolve`], [`ColumnMap`] - Header column resolution
//! - [`score_row`], [`Preset`], [`Weights`] - Keyword scoring
//! - [`RowFilter`] - Threshold filters on resolved fields
//! - [`score_growth`], [`date_columns`] - Category growth scoring
//! - [`rank_by`] - Stable descending ranking with top-N

mod columns;
mod filter;
mod growth;
mod rank;
mod score;
mod value;

pub use columns::{
    COMPETITION, ColumnMap, ColumnSpec, HeaderMatch, MissingColumn, ROCKET_RATIO, SEARCH_VOLUME,
    find_column, keyword_columns, normalize_header, resolve,
};
pub use filter::{RowFilter, ThresholdOp, passes_all, unresolved_filter};
pub use growth::{
    DEFAULT_RECENT_COUNT, GROWTH_COLUMNS, GROWTH_RATE, GrowthScore, category_columns,
    date_columns, find_category_columns, parse_date_header, score_growth,
};
pub use rank::{Ranked, rank_by};
pub use score::{
    BASE_SCORE, FINAL_SCORE, Preset, SCORE_ADJUSTED, ScoredRow, ScoringConfig, WING_RATIO,
    Weights, base_score, derived_columns, final_score, score_row,
};
pub use value::{
    CellValue, Coerced, coerce, coerce_checked, coerce_present, format_number, number_to_field,
};
