//! Prometheus metrics definitions for stockcorr
//!
//! All metrics use the `stockcorr_` prefix and are read-only.

use prometheus::{
    CounterVec, Histogram, HistogramOpts, HistogramTimer, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the query service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Queries received, by operation
    pub queries_total: CounterVec,
    /// Queries rejected by validation, by reason
    pub rejected_total: CounterVec,
    /// Provider fetches by outcome (ok, error, timeout)
    pub provider_fetches_total: CounterVec,
    /// Provider fetch latency in seconds
    pub provider_fetch_seconds: Histogram,
    /// Aligned pairs per correlation query
    pub aligned_pairs: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance with all counters and histograms registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let queries_total = CounterVec::new(
            Opts::new("stockcorr_queries_total", "Queries received by operation"),
            &["operation"],
        )?;
        registry.register(Box::new(queries_total.clone()))?;

        let rejected_total = CounterVec::new(
            Opts::new(
                "stockcorr_rejected_total",
                "Queries rejected before any fetch, by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(rejected_total.clone()))?;

        let provider_fetches_total = CounterVec::new(
            Opts::new(
                "stockcorr_provider_fetches_total",
                "Price provider fetches by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(provider_fetches_total.clone()))?;

        let provider_fetch_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "stockcorr_provider_fetch_seconds",
                "Price provider fetch latency in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
        )?;
        registry.register(Box::new(provider_fetch_seconds.clone()))?;

        let aligned_pairs = Histogram::with_opts(
            HistogramOpts::new(
                "stockcorr_aligned_pairs",
                "Aligned observation pairs per correlation query",
            )
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
        )?;
        registry.register(Box::new(aligned_pairs.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            queries_total,
            rejected_total,
            provider_fetches_total,
            provider_fetch_seconds,
            aligned_pairs,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_queries(&self, operation: &str) {
        self.queries_total.with_label_values(&[operation]).inc();
    }

    pub fn inc_rejected(&self, reason: &str) {
        self.rejected_total.with_label_values(&[reason]).inc();
    }

    pub fn inc_fetches(&self, outcome: &str) {
        self.provider_fetches_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Observes fetch latency when the returned timer is dropped
    pub fn start_fetch_timer(&self) -> HistogramTimer {
        self.provider_fetch_seconds.start_timer()
    }

    pub fn observe_aligned_pairs(&self, pairs: usize) {
        self.aligned_pairs.observe(pairs as f64);
    }

    pub fn fetch_count(&self, outcome: &str) -> u64 {
        self.provider_fetches_total
            .with_label_values(&[outcome])
            .get() as u64
    }
}
