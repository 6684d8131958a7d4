//! Loading pre-fetched source lists from disk.
//!
//! Each configured source points at a JSON file written by that
//! provider's fetcher. A file that is missing or not valid JSON only
//! removes that source from the run; the engine treats it as a source
//! with zero records.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::config::{AppConfig, SourceFile};
use crate::error::Result;

/// Read and parse one source file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a JSON error if it
/// is not valid JSON.
pub fn load_source_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load every configured source, keyed by source name.
///
/// Sources that fail to load are logged and left out of the map.
pub fn load_sources(config: &AppConfig) -> HashMap<String, Value> {
    config
        .sources
        .iter()
        .filter_map(|source| load_one(source).map(|raw| (source.name.clone(), raw)))
        .collect()
}

fn load_one(source: &SourceFile) -> Option<Value> {
    match load_source_file(&source.path) {
        Ok(raw) => {
            tracing::debug!(source = %source.name, path = %source.path.display(), "loaded source file");
            Some(raw)
        }
        Err(err) => {
            tracing::warn!(
                source = %source.name,
                path = %source.path.display(),
                error = %err,
                "source file unavailable, treating as empty"
            );
            None
        }
    }
}
