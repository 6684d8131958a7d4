//! Aggregation configuration.
//!
//! [`AggregateConfig`] declares the sources in the order they are folded
//! in, how each source's raw records are shaped, and which one source is
//! primary for URL provenance.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::AggregateError;

/// Field layout and role of one ranking provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Symbolic name, used as the key in each entry's `rank` map.
    pub name: String,
    /// Field holding the domain (or a URL to take the host from).
    pub domain_field: String,
    /// Field holding an optional direct URL.
    pub url_field: Option<String>,
    /// Field holding the 1-based rank.
    pub rank_field: String,
    /// Whether this source is authoritative for URLs.
    pub primary: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain_field: "domain".to_owned(),
            url_field: None,
            rank_field: "rank".to_owned(),
            primary: false,
        }
    }
}

impl SourceConfig {
    /// A non-primary source with default field names.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The primary source with default field names.
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            primary: true,
            ..Self::new(name)
        }
    }

    /// Read the domain from `field` instead of `domain`.
    #[must_use]
    pub fn with_domain_field(mut self, field: impl Into<String>) -> Self {
        self.domain_field = field.into();
        self
    }

    /// Read a direct URL from `field`.
    #[must_use]
    pub fn with_url_field(mut self, field: impl Into<String>) -> Self {
        self.url_field = Some(field.into());
        self
    }

    /// Read the rank from `field` instead of `rank`.
    #[must_use]
    pub fn with_rank_field(mut self, field: impl Into<String>) -> Self {
        self.rank_field = field.into();
        self
    }
}

/// Configuration for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Sources in fold order. The primary is always folded first
    /// regardless of where it appears here.
    pub sources: Vec<SourceConfig>,
    /// Keep only this many entries after ranking. `None` keeps all.
    pub max_results: Option<usize>,
}

impl AggregateConfig {
    /// Create a config over `sources` with no truncation.
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self {
            sources,
            max_results: None,
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - at least one source is declared
    /// - source names are non-empty and unique
    /// - `domain_field` and `rank_field` are non-empty
    /// - exactly one source is primary
    /// - `max_results`, when set, is greater than 0
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.sources.is_empty() {
            return Err(AggregateError::Config(
                "at least one source must be configured".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(AggregateError::Config(
                    "source name must not be empty".into(),
                ));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(AggregateError::Config(format!(
                    "duplicate source name `{}`",
                    source.name
                )));
            }
            if source.domain_field.is_empty() {
                return Err(AggregateError::Config(format!(
                    "source `{}`: domain_field must not be empty",
                    source.name
                )));
            }
            if source.rank_field.is_empty() {
                return Err(AggregateError::Config(format!(
                    "source `{}`: rank_field must not be empty",
                    source.name
                )));
            }
        }

        let primaries = self.sources.iter().filter(|s| s.primary).count();
        match primaries {
            0 => {
                return Err(AggregateError::MissingPrimary(
                    "no source is marked primary".into(),
                ))
            }
            1 => {}
            n => {
                return Err(AggregateError::Config(format!(
                    "exactly one source may be primary, found {n}"
                )))
            }
        }

        if self.max_results == Some(0) {
            return Err(AggregateError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The primary source, if one is declared.
    pub fn primary(&self) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.primary)
    }

    /// Names of every non-primary ("local-market") source.
    pub fn local_sources(&self) -> BTreeSet<String> {
        self.sources
            .iter()
            .filter(|s| !s.primary)
            .map(|s| s.name.clone())
            .collect()
    }
}
