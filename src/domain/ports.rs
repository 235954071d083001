use crate::domain::errors::ProviderError;
use crate::domain::market::{Series, WindowSpec};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of raw price observations for an instrument.
///
/// Adapters normalize whatever the upstream returns into a [`Series`]; the
/// series is not required to be sorted or already windowed.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_raw_series(
        &self,
        instrument: &str,
        window: WindowSpec,
    ) -> Result<Series, ProviderError>;
}

/// Supplies "now" for window cutoffs
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
