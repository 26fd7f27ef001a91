//! keyrank-core - Table model, storage and the ranking pipeline.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod table;

pub use config::KeyrankConfig;
pub use error::{KeyrankError, Result};
pub use pipeline::{GrowthRun, KeywordRun, OutputOptions, RunSummary};
pub use storage::OutputFormat;
pub use table::Table;

pub use keyrank_engine::engine::CellValue;
