//! Category growth scoring.
//!
//! Tables of this kind carry one column per day (`YYYY-MM-DD` headers) plus
//! category columns. Each row is summarized into totals over all days and
//! over the most recent days:
//!
//! ```text
//! total       = sum(all date columns)
//! recent_sum  = sum(newest `recent_count` date columns)
//! older_sum   = total - recent_sum
//! growth_rate = recent_sum / older_sum     (recent_sum when older_sum <= 0)
//! final_score = total * (1 + growth_rate)
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::columns::{ColumnSpec, HeaderMatch, find_column};
use super::value::CellValue;

pub const DEFAULT_RECENT_COUNT: usize = 3;

pub const TOTAL: &str = "total";
pub const RECENT_SUM: &str = "recent_sum";
pub const OLDER_SUM: &str = "older_sum";
pub const GROWTH_RATE: &str = "growth_rate";
pub const GROWTH_FINAL_SCORE: &str = "final_score";

/// Derived columns of a growth score, in output order.
pub const GROWTH_COLUMNS: [&str; 5] = [TOTAL, RECENT_SUM, OLDER_SUM, GROWTH_RATE, GROWTH_FINAL_SCORE];

/// Category columns, from broadest to narrowest.
pub fn category_columns() -> Vec<ColumnSpec> {
    ["대카테고리", "중카테고리", "소카테고리", "세부카테고리"]
        .iter()
        .map(|name| ColumnSpec::optional(name, &[name]))
        .collect()
}

/// Indices of category columns present in `header`, in category order.
pub fn find_category_columns(header: &[String], mode: HeaderMatch) -> Vec<(String, usize)> {
    category_columns()
        .into_iter()
        .filter_map(|spec| find_column(header, &spec.spellings, mode).map(|idx| (spec.field, idx)))
        .collect()
}

fn date_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

/// Parse a header as a calendar date. The whole header must be `YYYY-MM-DD`;
/// surrounding text or whitespace disqualifies it.
pub fn parse_date_header(name: &str) -> Option<NaiveDate> {
    if !date_header().is_match(name) {
        return None;
    }
    NaiveDate::parse_from_str(name, "%Y-%m-%d").ok()
}

/// Indices of date columns, newest first. Equal dates keep header order.
pub fn date_columns(header: &[String]) -> Vec<usize> {
    let mut dated: Vec<(usize, NaiveDate)> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| parse_date_header(name).map(|d| (idx, d)))
        .collect();
    dated.sort_by(|a, b| b.1.cmp(&a.1));
    dated.into_iter().map(|(idx, _)| idx).collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GrowthScore {
    pub total: f64,
    pub recent_sum: f64,
    pub older_sum: f64,
    pub growth_rate: f64,
    pub final_score: f64,
}

impl GrowthScore {
    /// Values in [`GROWTH_COLUMNS`] order.
    pub fn values(&self) -> [f64; 5] {
        [
            self.total,
            self.recent_sum,
            self.older_sum,
            self.growth_rate,
            self.final_score,
        ]
    }
}

/// Score one row. `dates` must be ordered newest first (see [`date_columns`]).
///
/// Only cells that already hold numbers are summed; text and blanks count as
/// nothing.
pub fn score_growth(row: &[CellValue], dates: &[usize], recent_count: usize) -> GrowthScore {
    let value_at = |idx: &usize| {
        row.get(*idx)
            .and_then(CellValue::as_number)
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    };

    let total: f64 = dates.iter().map(value_at).sum();
    let recent_sum: f64 = dates.iter().take(recent_count).map(value_at).sum();
    let older_sum = total - recent_sum;
    let growth_rate = if older_sum > 0.0 {
        recent_sum / older_sum
    } else {
        recent_sum
    };
    let final_score = total * (1.0 + growth_rate);

    GrowthScore {
        total: unsigned_zero(total),
        recent_sum: unsigned_zero(recent_sum),
        older_sum: unsigned_zero(older_sum),
        growth_rate: unsigned_zero(growth_rate),
        final_score: unsigned_zero(final_score),
    }
}

fn unsigned_zero(n: f64) -> f64 {
    if n == 0.0 { 0.0 } else { n }
}
