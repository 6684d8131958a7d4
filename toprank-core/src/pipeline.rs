//! End-to-end aggregation: read, merge, rank, truncate.
//!
//! Reads every configured source's raw document, folds the records
//! together with the primary first, orders the result with the composite
//! ranker and truncates to the configured maximum.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::AggregateConfig;
use crate::error::AggregateError;
use crate::merge::{merge, SourceBatch};
use crate::ranker::{rank_entries, RankPolicy};
use crate::reader::read_value;
use crate::types::AggregatedEntry;

/// Aggregate raw source documents into one ordered list.
///
/// `inputs` maps source name to that source's raw JSON document.
///
/// # Pipeline
///
/// 1. Validate `config`
/// 2. Read each configured source in declaration order. A missing or
///    malformed document is logged at warn level and counts as an empty
///    source
/// 3. Merge, primary first
/// 4. Rank with every non-primary source as local-market
/// 5. Truncate to `config.max_results`
///
/// # Errors
///
/// Returns [`AggregateError::MissingPrimary`] or [`AggregateError::Config`]
/// if the configuration is invalid. Problems inside a single source never
/// fail the run.
pub fn aggregate(
    config: &AggregateConfig,
    inputs: &HashMap<String, Value>,
) -> Result<Vec<AggregatedEntry>, AggregateError> {
    config.validate()?;

    let batches: Vec<SourceBatch> = config
        .sources
        .iter()
        .map(|source| {
            let records = match inputs.get(&source.name) {
                Some(raw) => match read_value(source, raw) {
                    Ok(records) => records,
                    Err(err) => {
                        tracing::warn!(source = %source.name, error = %err, "ignoring source input");
                        Vec::new()
                    }
                },
                None => {
                    tracing::warn!(source = %source.name, "no input for configured source");
                    Vec::new()
                }
            };
            tracing::debug!(source = %source.name, count = records.len(), "source records read");
            SourceBatch::new(source.name.clone(), records)
        })
        .collect();

    merge_and_rank(config, &batches)
}

/// Aggregate records that were already read.
///
/// Batches whose name is not a configured source are ignored. Configured
/// sources without a batch contribute nothing.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn aggregate_batches(
    config: &AggregateConfig,
    batches: &[SourceBatch],
) -> Result<Vec<AggregatedEntry>, AggregateError> {
    config.validate()?;
    merge_and_rank(config, batches)
}

/// Shared tail of both entry points. `config` is already validated.
fn merge_and_rank(
    config: &AggregateConfig,
    batches: &[SourceBatch],
) -> Result<Vec<AggregatedEntry>, AggregateError> {
    let policy = RankPolicy::from_config(config).ok_or_else(|| {
        AggregateError::MissingPrimary("no source is marked primary".into())
    })?;

    // Fold in declaration order; every configured source gets a batch so
    // the primary is always present, even when it produced nothing.
    let ordered: Vec<SourceBatch> = config
        .sources
        .iter()
        .map(|source| {
            let records: Vec<_> = batches
                .iter()
                .filter(|b| b.source == source.name)
                .flat_map(|b| b.records.iter().cloned())
                .collect();
            SourceBatch::new(source.name.clone(), records)
        })
        .collect();

    for batch in batches {
        if !config.sources.iter().any(|s| s.name == batch.source) {
            tracing::warn!(source = %batch.source, "ignoring records from unconfigured source");
        }
    }

    let merged = merge(&policy.primary, &ordered)?;
    let mut ranked = rank_entries(merged, &policy);

    if let Some(max) = config.max_results {
        ranked.truncate(max);
    }

    tracing::info!(
        sources = config.sources.len(),
        entries = ranked.len(),
        "aggregation complete"
    );
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::types::SourceRecord;
    use serde_json::json;

    fn config() -> AggregateConfig {
        AggregateConfig::new(vec![
            SourceConfig::primary("tranco").with_url_field("url"),
            SourceConfig::new("similarweb").with_domain_field("site"),
            SourceConfig::new("semrush"),
        ])
    }

    fn websites(entries: &[AggregatedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.website.as_str()).collect()
    }

    #[test]
    fn aggregates_raw_documents() {
        let mut inputs = HashMap::new();
        inputs.insert(
            "tranco".to_owned(),
            json!([
                {"rank": 1, "domain": "google.com", "url": "https://www.google.com"},
                {"rank": 10, "domain": "a.tw"}
            ]),
        );
        inputs.insert(
            "similarweb".to_owned(),
            json!([{"rank": 3, "site": "www.b.tw"}, {"rank": 1, "site": "A.tw"}]),
        );
        inputs.insert("semrush".to_owned(), json!([{"rank": 7, "domain": "b.tw"}]));

        let ranked = aggregate(&config(), &inputs).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["b.tw", "a.tw", "google.com"]);
        assert_eq!(ranked[0].url.as_deref(), Some("https://b.tw"));
        assert_eq!(ranked[2].url.as_deref(), Some("https://www.google.com"));
        assert_eq!(ranked[1].rank_in("tranco"), Some(10));
        assert_eq!(ranked[1].rank_in("similarweb"), Some(1));
    }

    #[test]
    fn unicode_host_from_url_merges_with_bare_domain() {
        let config = AggregateConfig::new(vec![
            SourceConfig::primary("tranco"),
            SourceConfig::new("crux").with_domain_field("origin"),
            SourceConfig::new("similarweb"),
        ]);
        let mut inputs = HashMap::new();
        inputs.insert("crux".to_owned(), json!([{"rank": 1000, "origin": "https://www.台灣.tw"}]));
        inputs.insert("similarweb".to_owned(), json!([{"rank": 4, "domain": "台灣.tw"}]));

        let ranked = aggregate(&config, &inputs).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["台灣.tw"]);
        assert_eq!(ranked[0].rank_in("crux"), Some(1000));
        assert_eq!(ranked[0].rank_in("similarweb"), Some(4));
    }

    #[test]
    fn malformed_and_missing_sources_are_isolated() {
        let mut inputs = HashMap::new();
        inputs.insert("tranco".to_owned(), json!([{"rank": 1, "domain": "a.tw"}]));
        inputs.insert("similarweb".to_owned(), json!({"error": "challenge page"}));

        let ranked = aggregate(&config(), &inputs).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["a.tw"]);
    }

    #[test]
    fn primary_without_input_is_not_fatal() {
        let mut inputs = HashMap::new();
        inputs.insert("semrush".to_owned(), json!([{"rank": 2, "domain": "c.tw"}]));
        let ranked = aggregate(&config(), &inputs).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["c.tw"]);
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = AggregateConfig::new(vec![SourceConfig::new("semrush")]);
        let err = aggregate(&config, &HashMap::new()).unwrap_err();
        assert!(matches!(err, AggregateError::MissingPrimary(_)));
    }

    #[test]
    fn batch_entry_point_validates_config() {
        let config = AggregateConfig::new(vec![
            SourceConfig::primary("tranco"),
            SourceConfig::primary("crux"),
        ]);
        let batches = vec![SourceBatch::new("tranco", vec![SourceRecord::new("a.tw", 1)])];
        let err = aggregate_batches(&config, &batches).unwrap_err();
        assert!(matches!(err, AggregateError::Config(_)));
    }

    #[test]
    fn truncates_to_max_results() {
        let config = AggregateConfig {
            max_results: Some(2),
            ..config()
        };
        let batches = vec![SourceBatch::new(
            "tranco",
            (1..=5).map(|i| SourceRecord::new(format!("site{i}.tw"), i)).collect(),
        )];
        let ranked = aggregate_batches(&config, &batches).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["site1.tw", "site2.tw"]);
    }

    #[test]
    fn unconfigured_batches_are_ignored() {
        let batches = vec![
            SourceBatch::new("tranco", vec![SourceRecord::new("a.tw", 1)]),
            SourceBatch::new("alexa", vec![SourceRecord::new("z.tw", 1)]),
        ];
        let ranked = aggregate_batches(&config(), &batches).expect("aggregate");
        assert_eq!(websites(&ranked), vec!["a.tw"]);
    }

    #[test]
    fn batch_order_does_not_change_primary_urls() {
        let batches = vec![
            SourceBatch::new("semrush", vec![SourceRecord::new("a.tw", 4)]),
            SourceBatch::new(
                "tranco",
                vec![SourceRecord::new("a.tw", 2).with_url("https://a.tw/tw")],
            ),
        ];
        let ranked = aggregate_batches(&config(), &batches).expect("aggregate");
        assert_eq!(ranked[0].url.as_deref(), Some("https://a.tw/tw"));
    }
}
