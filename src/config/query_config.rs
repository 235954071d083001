//! Query defaults: window, alignment tolerance and fetch timeout.

use super::{EnvLookup, parse_var};
use crate::domain::analytics::{AlignmentMethod, AlignmentPolicy, AlignmentTolerance};
use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Window used when the caller doesn't give one
    pub default_window_minutes: i64,
    /// Ten minutes unless overridden. Changing it changes which ticks count as simultaneous.
    pub alignment_tolerance_ms: u64,
    pub alignment_method: AlignmentMethod,
    /// Upper bound on a single provider fetch, including retries
    pub fetch_timeout_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_window_minutes: 60,
            alignment_tolerance_ms: 10 * 60 * 1000,
            alignment_method: AlignmentMethod::Scan,
            fetch_timeout_ms: 8_000,
        }
    }
}

impl QueryConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        let alignment_method = match lookup("ALIGNMENT_METHOD") {
            Some(raw) => AlignmentMethod::from_str(raw.trim())?,
            None => defaults.alignment_method,
        };

        Ok(Self {
            default_window_minutes: parse_var(
                lookup,
                "DEFAULT_WINDOW_MINUTES",
                defaults.default_window_minutes,
            )?,
            alignment_tolerance_ms: parse_var(
                lookup,
                "ALIGNMENT_TOLERANCE_MS",
                defaults.alignment_tolerance_ms,
            )?,
            alignment_method,
            fetch_timeout_ms: parse_var(lookup, "FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms)?,
        })
    }

    pub fn alignment_policy(&self) -> AlignmentPolicy {
        AlignmentPolicy::new(
            AlignmentTolerance::from_millis(self.alignment_tolerance_ms),
            self.alignment_method,
        )
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
