//! Header column resolution.
//!
//! Maps logical field names (e.g. `search_volume`) to zero-based column
//! indices in an arbitrary header. Spreadsheet exports frequently wrap header
//! text over several lines ("최근\n30일\n검색량"), so matching can either
//! compare literally or ignore whitespace entirely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SEARCH_VOLUME: &str = "search_volume";
pub const COMPETITION: &str = "competition";
pub const ROCKET_RATIO: &str = "rocket_ratio";

/// How header text is compared against accepted spellings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatch {
    /// Literal comparison, embedded newlines included.
    Exact,
    /// Every whitespace character is removed from both sides first.
    #[default]
    Normalized,
}

impl HeaderMatch {
    pub fn matches(self, header: &str, spelling: &str) -> bool {
        match self {
            HeaderMatch::Exact => header == spelling,
            HeaderMatch::Normalized => normalize_header(header) == normalize_header(spelling),
        }
    }
}

/// Strip all whitespace (spaces, tabs, newlines) from a header name.
pub fn normalize_header(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A logical field and the header spellings accepted for it.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub field: String,
    pub spellings: Vec<String>,
    pub required: bool,
}

impl ColumnSpec {
    pub fn required(field: &str, spellings: &[&str]) -> ColumnSpec {
        ColumnSpec {
            field: field.to_string(),
            spellings: spellings.iter().map(|s| s.to_string()).collect(),
            required: true,
        }
    }

    pub fn optional(field: &str, spellings: &[&str]) -> ColumnSpec {
        ColumnSpec {
            required: false,
            ..ColumnSpec::required(field, spellings)
        }
    }

    /// Append extra spellings, skipping ones already accepted.
    pub fn with_spellings<I, S>(mut self, extra: I) -> ColumnSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for spelling in extra {
            let spelling = spelling.into();
            if !self.spellings.contains(&spelling) {
                self.spellings.push(spelling);
            }
        }
        self
    }
}

/// Built-in specs for keyword scoring.
pub fn keyword_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::required(SEARCH_VOLUME, &["최근\n30일\n검색량", "검색량", SEARCH_VOLUME]),
        ColumnSpec::required(COMPETITION, &["네이버\n경쟁강도", "경쟁률", COMPETITION]),
        ColumnSpec::optional(ROCKET_RATIO, &["쿠팡\n로켓\n+\n그로스\n비율", ROCKET_RATIO]),
    ]
}

/// A required field that no header column matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingColumn {
    pub field: String,
}

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required column not found: {}", self.field)
    }
}

impl std::error::Error for MissingColumn {}

/// Resolved logical field -> column index mapping for one table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: BTreeMap<String, usize>,
}

impl ColumnMap {
    pub fn get(&self, field: &str) -> Option<usize> {
        self.indices.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.indices.contains_key(field)
    }

    pub fn insert(&mut self, field: &str, index: usize) {
        self.indices.insert(field.to_string(), index);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.indices.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Find the first header column matching any of `spellings`.
///
/// Spellings are tried in order, so earlier spellings take precedence over
/// later ones even when the later one appears further left in the header.
pub fn find_column(header: &[String], spellings: &[String], mode: HeaderMatch) -> Option<usize> {
    spellings.iter().find_map(|spelling| {
        header
            .iter()
            .position(|name| mode.matches(name, spelling))
    })
}

/// Resolve every spec against `header`.
///
/// Fails on the first required field that cannot be found. Optional fields
/// that are absent are left out of the map.
pub fn resolve(
    header: &[String],
    specs: &[ColumnSpec],
    mode: HeaderMatch,
) -> Result<ColumnMap, MissingColumn> {
    let mut map = ColumnMap::default();
    for spec in specs {
        match find_column(header, &spec.spellings, mode) {
            Some(idx) => map.insert(&spec.field, idx),
            None if spec.required => {
                return Err(MissingColumn {
                    field: spec.field.clone(),
                });
            }
            None => {}
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_normalized_matches_wrapped_headers() {
        let h = header(&["키워드", "최근30일검색량", "네이버경쟁강도"]);
        let map = resolve(&h, &keyword_columns(), HeaderMatch::Normalized).unwrap();
        assert_eq!(map.get(SEARCH_VOLUME), Some(1));
        assert_eq!(map.get(COMPETITION), Some(2));
        assert_eq!(map.get(ROCKET_RATIO), None);
    }

    #[test]
    fn test_resolve_exact_requires_literal_newlines() {
        let flat = header(&["키워드", "최근30일검색량", "네이버경쟁강도"]);
        let err = resolve(&flat, &keyword_columns(), HeaderMatch::Exact).unwrap_err();
        assert_eq!(err.field, SEARCH_VOLUME);

        let wrapped = header(&[
            "키워드",
            "최근\n30일\n검색량",
            "네이버\n경쟁강도",
            "쿠팡\n로켓\n+\n그로스\n비율",
        ]);
        let map = resolve(&wrapped, &keyword_columns(), HeaderMatch::Exact).unwrap();
        assert_eq!(map.get(SEARCH_VOLUME), Some(1));
        assert_eq!(map.get(COMPETITION), Some(2));
        assert_eq!(map.get(ROCKET_RATIO), Some(3));
    }

    #[test]
    fn test_resolve_missing_required_names_field() {
        let h = header(&["키워드", "최근30일검색량"]);
        let err = resolve(&h, &keyword_columns(), HeaderMatch::Normalized).unwrap_err();
        assert_eq!(err.field, COMPETITION);
        assert_eq!(err.to_string(), "required column not found: competition");
    }

    #[test]
    fn test_resolve_optional_absent_is_not_an_error() {
        let h = header(&["search_volume", "competition"]);
        let map = resolve(&h, &keyword_columns(), HeaderMatch::Normalized).unwrap();
        assert!(!map.contains(ROCKET_RATIO));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_earlier_spelling_wins() {
        let h = header(&["검색량", "최근 30일 검색량"]);
        let idx = find_column(
            &h,
            &["최근30일검색량".to_string(), "검색량".to_string()],
            HeaderMatch::Normalized,
        );
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn test_duplicate_headers_first_match_wins() {
        let h = header(&["competition", "competition"]);
        assert_eq!(
            find_column(&h, &["competition".to_string()], HeaderMatch::Exact),
            Some(0)
        );
    }

    #[test]
    fn test_with_spellings_dedups() {
        let spec = ColumnSpec::required("x", &["a"]).with_spellings(["a", "b"]);
        assert_eq!(spec.spellings, vec!["a", "b"]);
    }
}
