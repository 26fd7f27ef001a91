//! Threshold filters on resolved numeric fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::columns::ColumnMap;
use super::value::{CellValue, coerce_present};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdOp {
    /// `value >= threshold`
    AtLeast,
    /// `value < threshold`
    Below,
}

/// Keep rows whose `field` satisfies `op` against `value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowFilter {
    pub field: String,
    pub op: ThresholdOp,
    pub value: f64,
}

impl RowFilter {
    pub fn at_least(field: &str, value: f64) -> RowFilter {
        RowFilter {
            field: field.to_string(),
            op: ThresholdOp::AtLeast,
            value,
        }
    }

    pub fn below(field: &str, value: f64) -> RowFilter {
        RowFilter {
            field: field.to_string(),
            op: ThresholdOp::Below,
            value,
        }
    }

    /// Blank cells never pass.
    pub fn keep(&self, value: Option<f64>) -> bool {
        let Some(v) = value else {
            return false;
        };
        match self.op {
            ThresholdOp::AtLeast => v >= self.value,
            ThresholdOp::Below => v < self.value,
        }
    }

    /// Evaluate against a raw row. Returns `None` if `field` is not resolved.
    pub fn keep_row(&self, row: &[CellValue], columns: &ColumnMap) -> Option<bool> {
        let idx = columns.get(&self.field)?;
        Some(self.keep(coerce_present(row.get(idx))))
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            ThresholdOp::AtLeast => ">=",
            ThresholdOp::Below => "<",
        };
        write!(f, "{} {} {}", self.field, op, self.value)
    }
}

/// The first filter whose field is missing from `columns`, if any.
pub fn unresolved_filter<'a>(filters: &'a [RowFilter], columns: &ColumnMap) -> Option<&'a RowFilter> {
    filters.iter().find(|f| !columns.contains(&f.field))
}

/// True when `row` passes every filter. Filters on unresolved fields pass.
pub fn passes_all(row: &[CellValue], filters: &[RowFilter], columns: &ColumnMap) -> bool {
    filters
        .iter()
        .all(|f| f.keep_row(row, columns).unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::columns::{COMPETITION, SEARCH_VOLUME};

    fn map() -> ColumnMap {
        let mut columns = ColumnMap::default();
        columns.insert(SEARCH_VOLUME, 0);
        columns.insert(COMPETITION, 1);
        columns
    }

    #[test]
    fn test_at_least_is_inclusive() {
        let f = RowFilter::at_least(SEARCH_VOLUME, 8000.0);
        assert!(f.keep(Some(8000.0)));
        assert!(!f.keep(Some(7999.0)));
    }

    #[test]
    fn test_below_is_exclusive() {
        let f = RowFilter::below(COMPETITION, 3.1);
        assert!(f.keep(Some(3.0)));
        assert!(!f.keep(Some(3.1)));
    }

    #[test]
    fn test_blank_cells_never_pass() {
        let f = RowFilter::below(COMPETITION, 3.1);
        let row = vec![CellValue::Number(9000.0), CellValue::Empty];
        assert_eq!(f.keep_row(&row, &map()), Some(false));
    }

    #[test]
    fn test_text_values_are_coerced() {
        let f = RowFilter::at_least(SEARCH_VOLUME, 8000.0);
        let row = vec![CellValue::new_text("12,000"), CellValue::Number(1.0)];
        assert_eq!(f.keep_row(&row, &map()), Some(true));
    }

    #[test]
    fn test_passes_all() {
        let filters = vec![
            RowFilter::at_least(SEARCH_VOLUME, 8000.0),
            RowFilter::below(COMPETITION, 3.1),
        ];
        let good = vec![CellValue::Number(9000.0), CellValue::Number(1.0)];
        let bad = vec![CellValue::Number(9000.0), CellValue::Number(5.0)];
        assert!(passes_all(&good, &filters, &map()));
        assert!(!passes_all(&bad, &filters, &map()));
    }

    #[test]
    fn test_unresolved_filter() {
        let filters = vec![RowFilter::at_least("rocket_ratio", 10.0)];
        assert_eq!(
            unresolved_filter(&filters, &map()).map(|f| f.field.as_str()),
            Some("rocket_ratio")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RowFilter::at_least(SEARCH_VOLUME, 8000.0).to_string(),
            "search_volume >= 8000"
        );
    }
}
