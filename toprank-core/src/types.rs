//! Core types shared by the reader, merge engine and ranker.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One entry from one provider's list, after field extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Bare domain as the provider reported it (not yet normalised).
    pub domain: String,
    /// 1-based position in the provider's list. Passed through unchecked.
    pub rank: u32,
    /// Direct URL supplied by the provider, if it has one.
    pub url: Option<String>,
}

impl SourceRecord {
    /// Build a record without a URL.
    pub fn new(domain: impl Into<String>, rank: u32) -> Self {
        Self {
            domain: domain.into(),
            rank,
            url: None,
        }
    }

    /// Attach a provider-supplied URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Canonical merge key for a domain.
///
/// Built by [`crate::normalize::normalize_domain`]. The empty key is a
/// sentinel for "no usable domain" and is never stored in a merged map.
/// Deserializing also goes through `normalize_domain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty sentinel key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for NormalizedKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(crate::normalize::normalize_domain(&raw))
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single domain after all sources have been folded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    /// Normalised domain key.
    pub website: NormalizedKey,
    /// Canonical URL. `None` only between merging and ranking; the ranker
    /// fills in `https://{website}` for anything still missing.
    pub url: Option<String>,
    /// Per-source rank, keyed by source name. Never empty.
    pub rank: BTreeMap<String, u32>,
}

impl AggregatedEntry {
    /// Start an entry with a single source's rank.
    pub fn new(website: NormalizedKey, source: &str, rank: u32, url: Option<String>) -> Self {
        let mut ranks = BTreeMap::new();
        ranks.insert(source.to_owned(), rank);
        Self {
            website,
            url,
            rank: ranks,
        }
    }

    /// Rank given by `source`, if it listed this domain.
    pub fn rank_in(&self, source: &str) -> Option<u32> {
        self.rank.get(source).copied()
    }

    /// Fallback URL used when no primary-source URL was recorded.
    pub fn synthesized_url(&self) -> String {
        format!("https://{}", self.website)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NormalizedKey {
        NormalizedKey::from_normalized(s.to_owned())
    }

    #[test]
    fn source_record_builder() {
        let record = SourceRecord::new("example.tw", 4).with_url("https://example.tw/");
        assert_eq!(record.domain, "example.tw");
        assert_eq!(record.rank, 4);
        assert_eq!(record.url.as_deref(), Some("https://example.tw/"));
    }

    #[test]
    fn normalized_key_orders_lexicographically() {
        let mut keys = vec![key("b.tw"), key("a.tw"), key("a.com")];
        keys.sort();
        let ordered: Vec<&str> = keys.iter().map(NormalizedKey::as_str).collect();
        assert_eq!(ordered, vec!["a.com", "a.tw", "b.tw"]);
    }

    #[test]
    fn empty_key_is_sentinel() {
        assert!(NormalizedKey::default().is_empty());
        assert!(!key("a.tw").is_empty());
    }

    #[test]
    fn entry_serializes_with_expected_field_names() {
        let entry = AggregatedEntry::new(key("a.tw"), "tranco", 3, None);
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["website"], "a.tw");
        assert!(value["url"].is_null());
        assert_eq!(value["rank"]["tranco"], 3);
    }

    #[test]
    fn deserialized_keys_are_normalized() {
        let key: NormalizedKey = serde_json::from_str("\" WWW.A.tw \"").expect("deserialize");
        assert_eq!(key.as_str(), "a.tw");

        let entry: AggregatedEntry = serde_json::from_value(serde_json::json!({
            "website": "WWW.News.A.tw",
            "url": null,
            "rank": {"tranco": 3}
        }))
        .expect("deserialize");
        assert_eq!(entry.website.as_str(), "news.a.tw");
    }

    #[test]
    fn rank_in_reports_only_listed_sources() {
        let entry = AggregatedEntry::new(key("a.tw"), "tranco", 3, None);
        assert_eq!(entry.rank_in("tranco"), Some(3));
        assert_eq!(entry.rank_in("crux"), None);
    }

    #[test]
    fn synthesized_url_uses_https_and_key() {
        let entry = AggregatedEntry::new(key("news.a.tw"), "tranco", 1, None);
        assert_eq!(entry.synthesized_url(), "https://news.a.tw");
    }
}
