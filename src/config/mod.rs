//! Configuration module
//!
//! Per-source crawl parameters (seed URL, bounds, selectors, URL patterns)
//! are supplied by a [`ConfigProvider`]. The built-in [`TomlConfigProvider`]
//! loads them from a TOML file of `[[source]]` tables and validates each
//! entry before any job can start.

mod provider;
mod types;
mod validation;

pub use provider::{ConfigProvider, TomlConfigProvider};
pub use types::{SelectorConfig, SourceConfig, UrlPatterns};
pub use validation::validate;
