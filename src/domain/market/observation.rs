use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One price reading for an instrument.
///
/// Serialized with the provider's field names so that price histories can be
/// echoed back to callers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt")]
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(price: f64, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.observed_at.timestamp_millis()
    }

    /// Absolute distance to another observation, in milliseconds
    pub fn gap_millis(&self, other: &Observation) -> u64 {
        self.timestamp_millis().abs_diff(other.timestamp_millis())
    }

    /// Total order by time, then price. Used wherever a result must not depend
    /// on the order the provider returned observations in.
    pub fn chronological_cmp(&self, other: &Observation) -> Ordering {
        self.observed_at
            .cmp(&other.observed_at)
            .then_with(|| self.price.total_cmp(&other.price))
    }
}

/// Observations for a single instrument, in provider order (not necessarily sorted).
pub type Series = Vec<Observation>;

/// Prices of two instruments observed at (nearly) the same moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    pub price_a: f64,
    pub price_b: f64,
}

impl AlignedPair {
    pub fn new(price_a: f64, price_b: f64) -> Self {
        Self { price_a, price_b }
    }
}

/// Returns a copy of the series sorted with [`Observation::chronological_cmp`].
pub fn chronological(series: &[Observation]) -> Series {
    let mut sorted = series.to_vec();
    sorted.sort_by(Observation::chronological_cmp);
    sorted
}
