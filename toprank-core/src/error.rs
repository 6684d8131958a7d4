//! Error types for the toprank-core crate.
//!
//! Data-shape problems inside a single source (missing domain field,
//! unreadable rank) never surface here: those records are dropped where
//! they are read. Only conditions that invalidate a source's whole
//! contribution, or the run itself, become an [`AggregateError`].

/// Errors that can occur while aggregating ranking lists.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// No source is designated as primary, so URL provenance is undefined.
    #[error("missing primary source: {0}")]
    MissingPrimary(String),

    /// A source's raw input is not shaped as a list of records.
    #[error("malformed source input: {0}")]
    MalformedInput(String),

    /// Invalid aggregation configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for toprank-core results.
pub type Result<T> = std::result::Result<T, AggregateError>;
