//! Configuration module for stockcorr.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Price Provider, Query defaults, and Observability.

mod observability_config;
mod provider_config;
mod query_config;

pub use observability_config::ObservabilityEnvConfig;
pub use provider_config::ProviderConfig;
pub use query_config::QueryConfig;

use crate::application::analytics::QuerySettings;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Looks up a configuration variable by name
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Parses `key` if set, otherwise returns `default`.
pub(crate) fn parse_var<T>(lookup: EnvLookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {}: {}", key, raw)),
        None => Ok(default),
    }
}

/// Where price data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mock,
    Http,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "http" => Ok(Mode::Http),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'http'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub provider: ProviderConfig,
    pub query: QueryConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let mode_str = lookup("MODE").unwrap_or_else(|| "http".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let provider =
            ProviderConfig::from_lookup(lookup).context("Failed to load provider config")?;
        let query = QueryConfig::from_lookup(lookup).context("Failed to load query config")?;
        let observability = ObservabilityEnvConfig::from_lookup(lookup)
            .context("Failed to load observability config")?;

        Ok(Self {
            mode,
            provider,
            query,
            observability,
        })
    }

    /// Create the query service settings from this Config
    pub fn to_query_settings(&self) -> QuerySettings {
        QuerySettings {
            alignment: self.query.alignment_policy(),
            fetch_timeout: self.query.fetch_timeout(),
        }
    }
}
