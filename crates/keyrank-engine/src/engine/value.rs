//! Cell values and numeric coercion.
//!
//! This module provides the scalar type stored in a table cell and the
//! lenient conversion rules used by every scorer:
//! - [`CellValue`] - Empty, numeric or text content of a single cell
//! - [`coerce`] - Convert any cell to `f64`, degrading to `0.0`
//! - [`coerce_checked`] - Same conversion, but reports when a value was zeroed

/// The content of a single table cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn new_text(text: &str) -> CellValue {
        CellValue::Text(text.to_string())
    }

    /// Type a raw field read from a file.
    /// - Empty string -> Empty
    /// - Valid number -> Number (unless it has leading zeros like "007")
    /// - Otherwise -> Text
    pub fn from_field(field: &str) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }

        // Keep explicit surrounding whitespace as text.
        let trimmed = field.trim();
        if field != trimmed {
            return CellValue::new_text(field);
        }

        // Zero-padded codes ("007", "00123") are identifiers, not numbers.
        if trimmed.starts_with('0')
            && trimmed.len() > 1
            && !trimmed.starts_with("0.")
            && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            return CellValue::new_text(trimmed);
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::new_text(trimmed),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// The value if the cell already holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the value for a data file, keeping full precision.
    pub fn to_field_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => number_to_field(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// Result of a checked coercion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coerced {
    pub value: f64,
    /// True when a non-empty cell could not be read as a number and became `0.0`.
    pub zeroed: bool,
}

/// Convert a cell to `f64`.
///
/// Numbers pass through. Text has `,` thousands separators stripped before
/// parsing. Empty cells, unparsable text and non-finite results become `0.0`.
/// This never fails.
pub fn coerce(value: &CellValue) -> f64 {
    coerce_checked(value).value
}

/// Like [`coerce`], but flags values that were silently replaced by zero.
pub fn coerce_checked(value: &CellValue) -> Coerced {
    match value {
        CellValue::Empty => Coerced {
            value: 0.0,
            zeroed: false,
        },
        CellValue::Number(n) if n.is_finite() => Coerced {
            value: *n,
            zeroed: false,
        },
        CellValue::Number(_) => Coerced {
            value: 0.0,
            zeroed: true,
        },
        CellValue::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return Coerced {
                    value: 0.0,
                    zeroed: false,
                };
            }
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => Coerced {
                    value: n,
                    zeroed: false,
                },
                _ => Coerced {
                    value: 0.0,
                    zeroed: true,
                },
            }
        }
    }
}

/// Coerce a cell that may be absent, treating blanks as missing.
pub fn coerce_present(value: Option<&CellValue>) -> Option<f64> {
    match value {
        None => None,
        Some(v) if v.is_empty() => None,
        Some(v) => Some(coerce(v)),
    }
}

/// Format a number for a data file: integral values without a fraction,
/// everything else with the shortest round-trip representation.
pub fn number_to_field(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}
