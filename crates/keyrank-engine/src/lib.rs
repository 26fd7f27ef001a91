//! keyrank_engine - Column resolution, scoring and ranking for tabular data.

pub mod engine;
