//! User configuration (`keyrank.toml`).
//!
//! Every key is optional; command-line flags override file values, and file
//! values override built-in presets.

use crate::error::{KeyrankError, Result};
use crate::storage::OutputFormat;
use keyrank_engine::engine::{
    ColumnSpec, HeaderMatch, Preset, RowFilter, ScoringConfig, Weights, keyword_columns,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const CONFIG_FILE_NAME: &str = "keyrank.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeyrankConfig {
    pub preset: Option<Preset>,
    pub top_n: Option<usize>,
    pub header_match: Option<HeaderMatch>,
    pub marker: Option<String>,
    pub format: Option<OutputFormat>,
    /// Replaces the preset weights when present.
    pub weights: Option<Weights>,
    /// Extra header spellings per logical field. Unknown fields become
    /// optional columns that filters can refer to.
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub filters: Vec<RowFilter>,
    #[serde(default)]
    pub growth: GrowthConfig,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GrowthConfig {
    pub recent_count: Option<usize>,
    pub top_n: Option<usize>,
    pub marker: Option<String>,
}

impl KeyrankConfig {
    /// Load a config file, refusing files over 1 MiB.
    pub fn load(path: &Path) -> Result<Self> {
        let config_err = |message: String| KeyrankError::Config {
            path: path.to_path_buf(),
            message,
        };

        let meta = std::fs::metadata(path).map_err(|e| config_err(e.to_string()))?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(config_err(format!(
                "file too large ({} bytes, max {})",
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        toml::from_str(&content).map_err(|e| config_err(e.to_string()))
    }

    /// The preset in effect: `preset` if given, else the configured one.
    pub fn preset(&self, preset: Option<Preset>) -> Preset {
        preset.or(self.preset).unwrap_or_default()
    }

    /// Scoring weights for `preset` (or the configured preset), with any
    /// `[weights]` table taking precedence over the preset's own weights.
    pub fn scoring(&self, preset: Option<Preset>) -> ScoringConfig {
        let mut config = self.preset(preset).config();
        if let Some(weights) = &self.weights {
            config.weights = weights.clone();
        }
        config
    }

    /// Built-in keyword columns extended with configured spellings.
    pub fn keyword_columns(&self) -> Vec<ColumnSpec> {
        let mut specs = keyword_columns();
        for spec in specs.iter_mut() {
            if let Some(extra) = self.columns.get(&spec.field) {
                *spec = spec.clone().with_spellings(extra.iter().cloned());
            }
        }
        for (field, spellings) in &self.columns {
            if specs.iter().any(|s| &s.field == field) {
                continue;
            }
            let spellings: Vec<&str> = spellings.iter().map(String::as_str).collect();
            specs.push(ColumnSpec::optional(field, &spellings));
        }
        specs
    }
}
