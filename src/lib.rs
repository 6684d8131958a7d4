//! toprank: merge several "top domains" lists into one ranking.
//!
//! This crate is the file-level front end around [`toprank_core`]:
//! it reads a TOML config naming each provider's pre-fetched JSON list,
//! loads those lists, runs the aggregation engine and writes the result.
//!
//! # Flow
//!
//! config.toml → source files → `toprank_core::aggregate` → JSON output

pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod toprank_dirs;

pub use config::{AppConfig, SourceFile};
pub use error::{AppError, Result};
pub use toprank_core::AggregatedEntry;

/// Load every source named in `config` and aggregate them.
///
/// Unreadable source files count as empty sources.
///
/// # Errors
///
/// Returns [`AppError::Aggregate`] if the source setup is invalid (for
/// example no primary source).
pub fn aggregate_from_config(config: &AppConfig) -> Result<Vec<AggregatedEntry>> {
    let aggregate_config = config.to_aggregate_config();
    let inputs = input::load_sources(config);
    Ok(toprank_core::aggregate(&aggregate_config, &inputs)?)
}
