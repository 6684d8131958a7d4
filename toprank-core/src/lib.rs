//! # toprank-core
//!
//! Merges several independently produced "top domains" lists into one
//! deduplicated, ordered list of domains, each carrying its rank in every
//! source that listed it and a canonical URL.
//!
//! ## Design
//!
//! - Domains are compared by a normalised key (lowercase, one leading
//!   `www.` removed)
//! - One source is primary: it is folded first and is the only source
//!   whose URLs are kept
//! - Every other source is "local-market": entries ranked by any of them
//!   form the top tier, ordered by coverage, mean rank and best rank
//! - Primary-only entries follow, ordered by primary rank
//! - The domain key breaks any remaining tie, so output order never
//!   depends on hash-map iteration
//!
//! Fetching and parsing the provider lists is out of scope; this crate
//! starts from parsed JSON values or [`SourceRecord`]s and does no I/O.

pub mod config;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod ranker;
pub mod reader;
pub mod types;

pub use config::{AggregateConfig, SourceConfig};
pub use error::{AggregateError, Result};
pub use merge::{merge, MergedEntries, SourceBatch};
pub use normalize::normalize_domain;
pub use pipeline::{aggregate, aggregate_batches};
pub use ranker::{rank_entries, RankKey, RankPolicy, Tier};
pub use types::{AggregatedEntry, NormalizedKey, SourceRecord};
