//! Keyword row scoring.
//!
//! ```text
//! base_score  = search_volume / (competition + 1)
//! wing_ratio  = 100 - rocket_ratio        (0 when the column is absent)
//! final_score = base_score * (1 + sum(weights) + wing_weight * wing_ratio / 100)
//! ```
//!
//! The scoring variants found in practice differ only in their weights, so
//! they are expressed as [`Preset`]s of the same formula.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::columns::{COMPETITION, ColumnMap, ROCKET_RATIO, SEARCH_VOLUME};
use super::value::{CellValue, coerce_checked};

pub const BASE_SCORE: &str = "base_score";
pub const WING_RATIO: &str = "wing_ratio";
pub const FINAL_SCORE: &str = "final_score";
pub const SCORE_ADJUSTED: &str = "score_adjusted";

/// Named scalar weights plus the wing weight.
///
/// Scalar weights are summed into the multiplier as-is; `wing_weight` scales
/// the normalized wing ratio.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default)]
    pub wing_weight: f64,
    #[serde(flatten)]
    pub scalars: BTreeMap<String, f64>,
}

impl Weights {
    pub fn new(wing_weight: f64) -> Weights {
        Weights {
            wing_weight,
            scalars: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, weight: f64) -> Weights {
        self.scalars.insert(name.to_string(), weight);
        self
    }

    /// Sum of every scalar weight (the wing weight excluded).
    pub fn scalar_sum(&self) -> f64 {
        self.scalars.values().sum()
    }
}

/// Built-in weight sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// `base * (1 + wing_ratio / 100)`, reported as `score_adjusted`.
    #[default]
    Basic,
    /// Keyword type, intent, competitor and platform weights plus a 0.2 wing weight.
    Weighted,
    /// `final = base`.
    Plain,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Basic, Preset::Weighted, Preset::Plain];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Weighted => "weighted",
            Preset::Plain => "plain",
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            Preset::Basic => Weights::new(1.0),
            Preset::Weighted => Weights::new(0.2)
                .with("type_weight", 0.1)
                .with("intent_weight", 0.05)
                .with("competitor_weight", -0.05)
                .with("platform_weight", 0.1),
            Preset::Plain => Weights::new(0.0),
        }
    }

    /// Name of the appended final score column.
    pub fn final_column(self) -> &'static str {
        match self {
            Preset::Basic => SCORE_ADJUSTED,
            Preset::Weighted | Preset::Plain => FINAL_SCORE,
        }
    }

    /// Row limit applied when neither the command line nor the config sets one.
    pub fn default_top_n(self) -> Option<usize> {
        match self {
            Preset::Weighted => Some(100),
            Preset::Basic | Preset::Plain => None,
        }
    }

    pub fn config(self) -> ScoringConfig {
        ScoringConfig {
            weights: self.weights(),
            final_column: self.final_column().to_string(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Preset::Basic),
            "weighted" => Ok(Preset::Weighted),
            "plain" => Ok(Preset::Plain),
            other => Err(format!(
                "unknown preset '{}' (expected basic, weighted or plain)",
                other
            )),
        }
    }
}

/// Everything the scorer needs besides the row itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    pub weights: Weights,
    pub final_column: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

/// A row with its derived values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredRow {
    /// Position of the row in the source table (0-based, header excluded).
    pub index: usize,
    pub cells: Vec<CellValue>,
    /// Derived `(name, value)` pairs in output order; the last one is the sort key.
    pub derived: Vec<(String, f64)>,
    /// Non-empty inputs that could not be read as numbers.
    pub coerced_cells: usize,
}

impl ScoredRow {
    pub fn final_score(&self) -> f64 {
        self.derived.last().map(|(_, v)| *v).unwrap_or(0.0)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.derived.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Names of the derived columns appended by [`score_row`], in order.
pub fn derived_columns(columns: &ColumnMap, config: &ScoringConfig) -> Vec<String> {
    let mut names = vec![BASE_SCORE.to_string()];
    if columns.contains(ROCKET_RATIO) {
        names.push(WING_RATIO.to_string());
    }
    names.push(config.final_column.clone());
    names
}

/// Non-finite scores and `-0.0` both become `0.0`.
fn settle(score: f64) -> f64 {
    if score.is_finite() && score != 0.0 { score } else { 0.0 }
}

/// `search_volume / (competition + 1)`, or `0.0` when the denominator is zero.
pub fn base_score(search_volume: f64, competition: f64) -> f64 {
    let denom = competition + 1.0;
    if denom == 0.0 {
        return 0.0;
    }
    settle(search_volume / denom)
}

/// Apply the weight multiplier to a base score.
pub fn final_score(base: f64, wing_ratio: f64, weights: &Weights) -> f64 {
    let multiplier = 1.0 + weights.scalar_sum() + weights.wing_weight * (wing_ratio / 100.0);
    settle(base * multiplier)
}

/// Score a single row. Pure: depends only on the row, the map and the config.
pub fn score_row(
    index: usize,
    row: &[CellValue],
    columns: &ColumnMap,
    config: &ScoringConfig,
) -> ScoredRow {
    let mut coerced_cells = 0;
    let mut read = |field: &str| -> Option<f64> {
        let idx = columns.get(field)?;
        let coerced = coerce_checked(row.get(idx).unwrap_or(&CellValue::Empty));
        if coerced.zeroed {
            coerced_cells += 1;
        }
        Some(coerced.value)
    };

    let search_volume = read(SEARCH_VOLUME).unwrap_or(0.0);
    let competition = read(COMPETITION).unwrap_or(0.0);
    let rocket = read(ROCKET_RATIO);

    let base = base_score(search_volume, competition);
    let wing_ratio = rocket.map(|r| 100.0 - r).unwrap_or(0.0);
    let score = final_score(base, wing_ratio, &config.weights);

    let mut derived = vec![(BASE_SCORE.to_string(), base)];
    if rocket.is_some() {
        derived.push((WING_RATIO.to_string(), wing_ratio));
    }
    derived.push((config.final_column.clone(), score));

    ScoredRow {
        index,
        cells: row.to_vec(),
        derived,
        coerced_cells,
    }
}
