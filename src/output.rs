//! Writing the aggregated list.
//!
//! Output is a pretty-printed JSON array of `{website, url, rank}`
//! objects, in ranked order.

use std::io::Write;
use std::path::Path;

use toprank_core::AggregatedEntry;

use crate::error::Result;

/// Serialize `entries` to `writer` followed by a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_entries<W: Write>(entries: &[AggregatedEntry], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write `entries` to `path`, creating parent directories, or to stdout
/// when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_output(entries: &[AggregatedEntry], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(path)?;
            write_entries(entries, std::io::BufWriter::new(file))?;
            tracing::info!(path = %path.display(), entries = entries.len(), "wrote aggregated list");
        }
        None => write_entries(entries, std::io::stdout().lock())?,
    }
    Ok(())
}
