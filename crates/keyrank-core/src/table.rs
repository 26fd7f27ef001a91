//! In-memory table: a header row plus data rows.

use keyrank_engine::engine::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// A whole sheet held in memory for one run.
///
/// Rows may be shorter than the header; missing cells read as empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Table {
            header,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { header, rows }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns: the header width or the widest row, whichever is larger.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.header.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Copy of a row padded with empty cells to `width`.
    pub fn padded_row(&self, row: usize, width: usize) -> Vec<CellValue> {
        let mut cells = self.rows.get(row).cloned().unwrap_or_default();
        if cells.len() < width {
            cells.resize(width, CellValue::Empty);
        }
        cells
    }
}
