//! Configuration providers
//!
//! The job controller asks a [`ConfigProvider`] for the per-source crawl
//! parameters at job start. The default implementation loads a TOML file of
//! `[[source]]` tables; callers with their own settings backend implement the
//! trait directly.

use crate::config::types::SourceConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Supplies per-source crawl configuration
///
/// A missing or invalid source is a fatal [`ConfigError`]: the job aborts
/// before any fetch occurs.
pub trait ConfigProvider: Send + Sync {
    /// Resolves the configuration for one source
    fn source_config(&self, source_id: &str) -> Result<SourceConfig, ConfigError>;
}

/// File shape for the TOML-backed provider
#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(rename = "source", default)]
    sources: Vec<SourceConfig>,
}

/// TOML-backed configuration provider
///
/// Loads a file of `[[source]]` tables, validates every entry at load time,
/// and serves lookups by `source-id`.
///
/// # Example
///
/// ```no_run
/// use civicrawl::config::TomlConfigProvider;
/// use std::path::Path;
///
/// let provider = TomlConfigProvider::load(Path::new("sources.toml")).unwrap();
/// ```
#[derive(Debug)]
pub struct TomlConfigProvider {
    sources: HashMap<String, SourceConfig>,
}

impl TomlConfigProvider {
    /// Loads and validates a sources file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates sources from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: SourcesFile = toml::from_str(content)?;

        let mut sources = HashMap::new();
        for config in file.sources {
            validate(&config)?;
            if sources.contains_key(&config.source_id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate source-id: {}",
                    config.source_id
                )));
            }
            sources.insert(config.source_id.clone(), config);
        }

        Ok(Self { sources })
    }

    /// Returns the number of configured sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are configured
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn source_config(&self, source_id: &str) -> Result<SourceConfig, ConfigError> {
        self.sources
            .get(source_id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownSource(source_id.to_string()))
    }
}
