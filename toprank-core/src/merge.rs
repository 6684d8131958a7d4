//! Fold every source's records into one entry per normalised domain.
//!
//! The primary source is folded first, in a pass of its own, so that the
//! URL on each entry always comes from the primary. Later sources only add
//! their rank to existing entries or open URL-less entries for domains the
//! primary did not list.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::AggregateError;
use crate::normalize::normalize_domain;
use crate::types::{AggregatedEntry, NormalizedKey, SourceRecord};

/// Merged entries keyed by normalised domain. Iteration order is
/// meaningless; order comes from [`crate::ranker`].
pub type MergedEntries = HashMap<NormalizedKey, AggregatedEntry>;

/// All records read from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    /// Source name, used as the key in each entry's `rank` map.
    pub source: String,
    /// Records in the provider's order.
    pub records: Vec<SourceRecord>,
}

impl SourceBatch {
    pub fn new(source: impl Into<String>, records: Vec<SourceRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }
}

/// Merge source batches into one entry per normalised domain.
///
/// `batches` is in declaration order. The batch named `primary` is folded
/// first regardless of its position; the rest follow in order.
///
/// Conflict rules:
/// - Primary duplicates: the strictly smaller rank wins and brings its URL
///   along. On a tie the first occurrence stays.
/// - Other sources: the later occurrence of a key overwrites the rank
///   for that source. They never set a URL.
///
/// Records whose domain normalises to the empty key are dropped.
///
/// # Errors
///
/// Returns [`AggregateError::MissingPrimary`] if no batch is named
/// `primary`. An empty primary batch is fine.
pub fn merge(primary: &str, batches: &[SourceBatch]) -> Result<MergedEntries, AggregateError> {
    if !batches.iter().any(|b| b.source == primary) {
        return Err(AggregateError::MissingPrimary(format!(
            "no input for primary source `{primary}`"
        )));
    }

    let mut entries = MergedEntries::new();
    for batch in batches.iter().filter(|b| b.source == primary) {
        fold_primary(&mut entries, batch);
    }
    for batch in batches.iter().filter(|b| b.source != primary) {
        fold_local(&mut entries, batch);
    }

    tracing::debug!(entries = entries.len(), sources = batches.len(), "merge complete");
    Ok(entries)
}

fn fold_primary(entries: &mut MergedEntries, batch: &SourceBatch) {
    let mut dropped = 0usize;
    for record in &batch.records {
        let key = normalize_domain(&record.domain);
        if key.is_empty() {
            dropped += 1;
            continue;
        }
        match entries.entry(key) {
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                let improves = entry
                    .rank_in(&batch.source)
                    .map_or(true, |existing| record.rank < existing);
                if improves {
                    entry.rank.insert(batch.source.clone(), record.rank);
                    entry.url.clone_from(&record.url);
                }
            }
            Entry::Vacant(slot) => {
                let website = slot.key().clone();
                slot.insert(AggregatedEntry::new(
                    website,
                    &batch.source,
                    record.rank,
                    record.url.clone(),
                ));
            }
        }
    }
    log_fold(batch, dropped);
}

fn fold_local(entries: &mut MergedEntries, batch: &SourceBatch) {
    let mut dropped = 0usize;
    for record in &batch.records {
        let key = normalize_domain(&record.domain);
        if key.is_empty() {
            dropped += 1;
            continue;
        }
        match entries.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.get_mut()
                    .rank
                    .insert(batch.source.clone(), record.rank);
            }
            Entry::Vacant(slot) => {
                let website = slot.key().clone();
                slot.insert(AggregatedEntry::new(website, &batch.source, record.rank, None));
            }
        }
    }
    log_fold(batch, dropped);
}

fn log_fold(batch: &SourceBatch, dropped: usize) {
    tracing::debug!(
        source = %batch.source,
        records = batch.records.len(),
        dropped,
        "folded source"
    );
}
