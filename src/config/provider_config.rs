//! Price provider configuration.

use super::{EnvLookup, parse_var};
use anyhow::Result;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://20.244.56.144/evaluation-service";

/// Upstream price API configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>`
    pub api_token: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            timeout_ms: 5_000,
            max_retries: 0,
        }
    }
}

impl ProviderConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_url: lookup("PRICE_API_BASE_URL").unwrap_or(defaults.base_url),
            api_token: lookup("PRICE_API_TOKEN").unwrap_or_default(),
            timeout_ms: parse_var(lookup, "PRICE_API_TIMEOUT_MS", defaults.timeout_ms)?,
            max_retries: parse_var(lookup, "PRICE_API_MAX_RETRIES", defaults.max_retries)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
