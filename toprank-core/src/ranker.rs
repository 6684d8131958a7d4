//! Composite ordering of merged entries.
//!
//! Every entry is reduced to a [`RankKey`] and the entries are sorted on
//! that key. The key's field order is the tie-break order:
//!
//! 1. tier: any local-market rank before primary-only
//! 2. number of local-market sources (more first)
//! 3. mean local-market rank (smaller first)
//! 4. best local-market rank (smaller first)
//! 5. primary rank, primary-only tier only (smaller first, missing last)
//! 6. domain key (lexicographic)
//!
//! Keys are unique per domain, so the order is total and does not depend
//! on the merged map's iteration order.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::config::AggregateConfig;
use crate::merge::MergedEntries;
use crate::types::{AggregatedEntry, NormalizedKey};

/// Which sources count as primary and which as local-market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankPolicy {
    /// Source whose rank orders the primary-only tier.
    pub primary: String,
    /// Every other source.
    pub local_sources: BTreeSet<String>,
}

impl RankPolicy {
    /// The primary is never counted as a local-market source, even when
    /// `local_sources` names it.
    pub fn new<I, S>(primary: impl Into<String>, local_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary = primary.into();
        let local_sources = local_sources
            .into_iter()
            .map(Into::into)
            .filter(|source: &String| *source != primary)
            .collect();
        Self {
            primary,
            local_sources,
        }
    }

    /// Policy for a validated config: its primary, and all other sources.
    pub fn from_config(config: &AggregateConfig) -> Option<Self> {
        let primary = config.primary()?;
        Some(Self {
            primary: primary.name.clone(),
            local_sources: config.local_sources(),
        })
    }
}

/// Coarse grouping of entries; declaration order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Ranked by at least one local-market source.
    LocalMarket,
    /// Ranked by the primary source (or nothing relevant) only.
    PrimaryOnly,
}

/// Sort key for one entry. Derived `Ord` compares fields top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    tier: Tier,
    local_count: Reverse<usize>,
    // Only compared between entries with equal `local_count`, where sum
    // order and mean order agree. Integer sums keep the order exact.
    local_sum: u64,
    local_min: u32,
    primary_rank: u64,
    website: NormalizedKey,
}

impl RankKey {
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Number of local-market sources that ranked the entry.
    pub fn local_count(&self) -> usize {
        self.local_count.0
    }

    /// Arithmetic mean of the local-market ranks, if there are any.
    pub fn mean_local_rank(&self) -> Option<f64> {
        let count = self.local_count();
        (count > 0).then(|| self.local_sum as f64 / count as f64)
    }

    /// Smallest local-market rank, if there are any.
    pub fn best_local_rank(&self) -> Option<u32> {
        (self.local_count() > 0).then_some(self.local_min)
    }

    pub fn website(&self) -> &NormalizedKey {
        &self.website
    }
}

/// Compute the sort key for `entry` under `policy`.
pub fn rank_key(entry: &AggregatedEntry, policy: &RankPolicy) -> RankKey {
    let local: Vec<u32> = entry
        .rank
        .iter()
        .filter(|(source, _)| policy.local_sources.contains(source.as_str()))
        .map(|(_, &rank)| rank)
        .collect();

    if local.is_empty() {
        let primary_rank = entry
            .rank_in(&policy.primary)
            .map_or(u64::MAX, u64::from);
        return RankKey {
            tier: Tier::PrimaryOnly,
            local_count: Reverse(0),
            local_sum: 0,
            local_min: 0,
            primary_rank,
            website: entry.website.clone(),
        };
    }

    RankKey {
        tier: Tier::LocalMarket,
        local_count: Reverse(local.len()),
        local_sum: local.iter().copied().map(u64::from).sum(),
        local_min: local.iter().copied().min().unwrap_or(0),
        primary_rank: 0,
        website: entry.website.clone(),
    }
}

/// Order merged entries and fill in missing URLs.
///
/// URLs are synthesised as `https://{website}` after sorting; the sort
/// only looks at ranks and the domain key.
pub fn rank_entries(entries: MergedEntries, policy: &RankPolicy) -> Vec<AggregatedEntry> {
    let mut keyed: Vec<(RankKey, AggregatedEntry)> = entries
        .into_values()
        .map(|entry| (rank_key(&entry, policy), entry))
        .collect();
    keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut synthesized = 0usize;
    let ranked: Vec<AggregatedEntry> = keyed
        .into_iter()
        .map(|(_, mut entry)| {
            if entry.url.is_none() {
                entry.url = Some(entry.synthesized_url());
                synthesized += 1;
            }
            entry
        })
        .collect();

    tracing::debug!(entries = ranked.len(), synthesized, "ranked entries");
    ranked
}
