//! Configuration file for an aggregation run.
//!
//! ```toml
//! output = "aggregated.json"
//! max_results = 500
//!
//! [[sources]]
//! name = "tranco"
//! path = "data/tranco.json"
//! url_field = "url"
//! primary = true
//!
//! [[sources]]
//! name = "similarweb"
//! path = "data/similarweb.json"
//! domain_field = "site"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toprank_core::{AggregateConfig, SourceConfig};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where to write the aggregated JSON. `None` writes to stdout.
    pub output: Option<PathBuf>,
    /// Keep only this many entries after ranking.
    pub max_results: Option<usize>,
    /// Sources in fold order.
    pub sources: Vec<SourceFile>,
}

/// One provider's pre-fetched list on disk and its field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFile {
    /// Symbolic source name, used as the key in the output `rank` map.
    pub name: String,
    /// JSON file holding the source's records (an array of objects).
    /// Relative paths are resolved against the config file's directory.
    pub path: PathBuf,
    /// Field holding the domain (or a URL to take the host from).
    pub domain_field: String,
    /// Field holding an optional direct URL.
    pub url_field: Option<String>,
    /// Field holding the rank.
    pub rank_field: String,
    /// Whether this source is authoritative for URLs.
    pub primary: bool,
}

impl Default for SourceFile {
    fn default() -> Self {
        let core = SourceConfig::default();
        Self {
            name: String::new(),
            path: PathBuf::new(),
            domain_field: core.domain_field,
            url_field: core.url_field,
            rank_field: core.rank_field,
            primary: core.primary,
        }
    }
}

impl SourceFile {
    /// Field layout and role as the aggregation engine sees it.
    pub fn to_source_config(&self) -> SourceConfig {
        SourceConfig {
            name: self.name.clone(),
            domain_field: self.domain_field.clone(),
            url_field: self.url_field.clone(),
            rank_field: self.rank_field.clone(),
            primary: self.primary,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// Relative `path` and `output` values are resolved against the
    /// directory containing `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Starter configuration written by `toprank init`.
    pub fn template() -> Self {
        let source = |name: &str, primary: bool| SourceFile {
            name: name.to_owned(),
            path: PathBuf::from("data").join(format!("{name}.json")),
            url_field: primary.then(|| "url".to_owned()),
            primary,
            ..Default::default()
        };
        Self {
            output: Some(PathBuf::from("aggregated.json")),
            max_results: None,
            sources: vec![
                source("tranco", true),
                source("similarweb", false),
                source("semrush", false),
            ],
        }
    }

    /// Engine configuration for this file.
    pub fn to_aggregate_config(&self) -> AggregateConfig {
        AggregateConfig {
            sources: self.sources.iter().map(SourceFile::to_source_config).collect(),
            max_results: self.max_results,
        }
    }

    /// The source marked primary, if any.
    pub fn primary(&self) -> Option<&SourceFile> {
        self.sources.iter().find(|s| s.primary)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for source in &mut self.sources {
            if source.path.is_relative() && !source.path.as_os_str().is_empty() {
                source.path = base.join(&source.path);
            }
        }
        if let Some(output) = self.output.as_mut() {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
    }
}
