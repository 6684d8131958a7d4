//! Error types for the toprank application layer.

/// Top-level error type for loading, aggregating and writing lists.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration file missing, unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Aggregation failed (invalid source setup or missing primary).
    #[error("aggregation error: {0}")]
    Aggregate(#[from] toprank_core::AggregateError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
