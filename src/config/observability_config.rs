//! Observability configuration parsing from environment variables.

use super::{EnvLookup, parse_var};
use anyhow::Result;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        Ok(Self {
            enabled: parse_var(lookup, "OBSERVABILITY_ENABLED", true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(&|_| None).unwrap();
        assert!(config.enabled);
    }
}
