use crate::domain::errors::ProviderError;
use crate::domain::market::{Observation, Series, WindowSpec};
use crate::domain::ports::PriceHistoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// In-memory price provider.
///
/// Clones share the fetch counter, so a test can keep one handle and give
/// another to the service under test.
#[derive(Clone, Default)]
pub struct MockPriceProvider {
    series: HashMap<String, Series>,
    failing: HashSet<String>,
    latency: Option<std::time::Duration>,
    fetches: Arc<AtomicUsize>,
}

impl MockPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `series` for `instrument`
    pub fn with_series(mut self, instrument: &str, series: Series) -> Self {
        self.series.insert(instrument.to_string(), series);
        self
    }

    /// Fail every fetch for `instrument` with a transport error
    pub fn failing_for(mut self, instrument: &str) -> Self {
        self.failing.insert(instrument.to_string());
        self
    }

    /// Delay every response
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Random-walk histories ending at `now`, one tick every `spacing`.
    pub fn random_walk(
        instruments: &[String],
        now: DateTime<Utc>,
        points: usize,
        spacing: Duration,
    ) -> Self {
        let mut rng = rand::rng();
        let mut provider = Self::new();

        for instrument in instruments {
            let mut price: f64 = rng.random_range(50.0..500.0);
            let mut history = Vec::with_capacity(points);
            for i in (0..points).rev() {
                price = (price * (1.0 + rng.random_range(-0.01..0.01))).max(0.01);
                // jitter so two instruments are never sampled on the same grid
                let jitter = Duration::milliseconds(rng.random_range(0..5_000));
                history.push(Observation::new(price, now - spacing * i as i32 - jitter));
            }
            provider.series.insert(instrument.clone(), history);
        }

        info!(
            "MockPriceProvider: Generated {} ticks for {:?}",
            points, instruments
        );
        provider
    }

    /// Number of fetches served so far, across all clones
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceHistoryProvider for MockPriceProvider {
    async fn fetch_raw_series(
        &self,
        instrument: &str,
        _window: WindowSpec,
    ) -> Result<Series, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.contains(instrument) {
            return Err(ProviderError::Transport {
                instrument: instrument.to_string(),
                reason: "connection refused".to_string(),
            });
        }

        Ok(self.series.get(instrument).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_fetches_across_clones() {
        let provider = MockPriceProvider::new().with_series("AAPL", vec![]);
        let handle = provider.clone();
        let window = WindowSpec::new(10).unwrap();

        assert!(provider.fetch_raw_series("AAPL", window).await.is_ok());
        assert!(provider.fetch_raw_series("MSFT", window).await.unwrap().is_empty());
        assert_eq!(handle.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let provider = MockPriceProvider::new().failing_for("NVDA");
        let window = WindowSpec::new(10).unwrap();

        let err = provider.fetch_raw_series("NVDA", window).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
    }

    #[test]
    fn test_random_walk_shape() {
        let now = Utc::now();
        let names = vec!["AMZN".to_string(), "GOOGL".to_string()];
        let provider = MockPriceProvider::random_walk(&names, now, 30, Duration::minutes(1));

        for name in &names {
            let series = &provider.series[name];
            assert_eq!(series.len(), 30);
            assert!(series.iter().all(|o| o.price > 0.0 && o.observed_at <= now));
        }
    }
}
