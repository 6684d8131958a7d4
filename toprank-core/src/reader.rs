//! Field extraction from a provider's raw records.
//!
//! Each provider ships its list in its own shape. A [`SourceConfig`]
//! names the fields that hold the domain, the rank and an optional URL;
//! this module maps raw JSON items onto [`SourceRecord`]s using those
//! names. Items that carry no usable domain or rank are dropped here and
//! never reach the merge.

use serde_json::Value;

use crate::config::SourceConfig;
use crate::error::AggregateError;
use crate::normalize::host_of;
use crate::types::SourceRecord;

/// Read every item of a source's raw JSON document.
///
/// The document must be a JSON array of objects.
///
/// # Errors
///
/// Returns [`AggregateError::MalformedInput`] if `raw` is not an array.
/// Individual bad items are skipped, not reported.
pub fn read_value(source: &SourceConfig, raw: &Value) -> Result<Vec<SourceRecord>, AggregateError> {
    let Some(items) = raw.as_array() else {
        return Err(AggregateError::MalformedInput(format!(
            "{}: expected a JSON array, found {}",
            source.name,
            value_kind(raw)
        )));
    };
    Ok(read_items(source, items))
}

/// Map raw items onto records, dropping those without a domain or rank.
pub fn read_items(source: &SourceConfig, items: &[Value]) -> Vec<SourceRecord> {
    let records: Vec<SourceRecord> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = read_item(source, item);
            if record.is_none() {
                tracing::trace!(source = %source.name, index, "dropping record without domain or rank");
            }
            record
        })
        .collect();

    let dropped = items.len() - records.len();
    if dropped > 0 {
        tracing::debug!(source = %source.name, dropped, kept = records.len(), "skipped unusable records");
    }
    records
}

/// Extract a single record. `None` means the item has no aggregation key.
pub fn read_item(source: &SourceConfig, item: &Value) -> Option<SourceRecord> {
    let raw_domain = non_blank_str(item.get(&source.domain_field)?)?;
    let domain = host_of(raw_domain).unwrap_or_else(|| raw_domain.trim().to_owned());
    if domain.is_empty() {
        return None;
    }

    let rank = read_rank(item.get(&source.rank_field)?)?;

    let url = source
        .url_field
        .as_deref()
        .and_then(|field| item.get(field))
        .and_then(non_blank_str)
        .map(|u| u.trim().to_owned());

    Some(SourceRecord { domain, rank, url })
}

/// Ranks are numbers, or numeric text when scraped from an HTML table.
fn read_rank(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|r| u32::try_from(r).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tranco() -> SourceConfig {
        SourceConfig::primary("tranco").with_url_field("url")
    }

    #[test]
    fn reads_domain_rank_and_url() {
        let raw = json!([
            {"rank": 1, "domain": "google.com", "url": "https://www.google.com/"},
            {"rank": 2, "domain": "youtube.com"}
        ]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert_eq!(
            records,
            vec![
                SourceRecord::new("google.com", 1).with_url("https://www.google.com/"),
                SourceRecord::new("youtube.com", 2),
            ]
        );
    }

    #[test]
    fn missing_or_blank_domain_is_dropped() {
        let raw = json!([
            {"rank": 1},
            {"rank": 2, "domain": ""},
            {"rank": 3, "domain": "   "},
            {"rank": 4, "domain": null},
            {"rank": 5, "domain": "a.tw"}
        ]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert_eq!(records, vec![SourceRecord::new("a.tw", 5)]);
    }

    #[test]
    fn custom_field_names() {
        let source = SourceConfig::new("similarweb")
            .with_domain_field("site")
            .with_rank_field("position");
        let raw = json!([{"position": 7, "site": "b.tw", "category": "News"}]);
        let records = read_value(&source, &raw).expect("array input");
        assert_eq!(records, vec![SourceRecord::new("b.tw", 7)]);
    }

    #[test]
    fn url_ignored_without_url_field() {
        let source = SourceConfig::new("semrush");
        let raw = json!([{"rank": 1, "domain": "a.tw", "url": "https://a.tw"}]);
        let records = read_value(&source, &raw).expect("array input");
        assert!(records[0].url.is_none());
    }

    #[test]
    fn blank_url_treated_as_absent() {
        let raw = json!([{"rank": 1, "domain": "a.tw", "url": " "}]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert!(records[0].url.is_none());
    }

    #[test]
    fn url_shaped_domain_reduced_to_host() {
        let source = SourceConfig::new("crux").with_domain_field("origin");
        let raw = json!([{"rank": 1000, "origin": "https://www.a.tw"}]);
        let records = read_value(&source, &raw).expect("array input");
        assert_eq!(records[0].domain, "www.a.tw");
    }

    #[test]
    fn ranks_pass_through_unchanged() {
        let raw = json!([
            {"rank": 3, "domain": "a.tw"},
            {"rank": 3, "domain": "b.tw"},
            {"rank": 0, "domain": "c.tw"},
            {"rank": 99999, "domain": "d.tw"}
        ]);
        let ranks: Vec<u32> = read_value(&tranco(), &raw)
            .expect("array input")
            .iter()
            .map(|r| r.rank)
            .collect();
        assert_eq!(ranks, vec![3, 3, 0, 99999]);
    }

    #[test]
    fn numeric_string_rank_accepted() {
        let raw = json!([{"rank": " 12 ", "domain": "a.tw"}]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert_eq!(records[0].rank, 12);
    }

    #[test]
    fn unreadable_rank_is_dropped() {
        let raw = json!([
            {"rank": -1, "domain": "a.tw"},
            {"rank": 1.5, "domain": "b.tw"},
            {"rank": "first", "domain": "c.tw"},
            {"domain": "d.tw"}
        ]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert!(records.is_empty());
    }

    #[test]
    fn non_object_items_are_dropped() {
        let raw = json!(["a.tw", 3, null, {"rank": 1, "domain": "b.tw"}]);
        let records = read_value(&tranco(), &raw).expect("array input");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn empty_array_is_valid() {
        let records = read_value(&tranco(), &json!([])).expect("array input");
        assert!(records.is_empty());
    }

    #[test]
    fn non_array_document_is_malformed() {
        let err = read_value(&tranco(), &json!({"data": []})).unwrap_err();
        assert!(matches!(err, AggregateError::MalformedInput(_)));
        assert!(err.to_string().contains("tranco"));
        assert!(err.to_string().contains("an object"));
    }
}
