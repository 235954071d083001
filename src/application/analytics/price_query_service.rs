use super::reports::{AverageReport, CorrelationReport, DataStatus, InstrumentReport};
use crate::domain::analytics::{AlignmentPolicy, correlate, summarize};
use crate::domain::errors::{ProviderError, ValidationError};
use crate::domain::market::{WindowSpec, filter_at};
use crate::domain::ports::{Clock, PriceHistoryProvider};
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Tunables for [`PriceQueryService`], usually built with `Config::to_query_settings`
#[derive(Debug, Clone, Copy)]
pub struct QuerySettings {
    pub alignment: AlignmentPolicy,
    /// Bound on each provider fetch; exceeding it yields an empty series
    pub fetch_timeout: Duration,
}

/// Answers average and correlation queries over a trailing window.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent queries.
pub struct PriceQueryService {
    provider: Arc<dyn PriceHistoryProvider>,
    clock: Arc<dyn Clock>,
    settings: QuerySettings,
    metrics: Metrics,
}

impl PriceQueryService {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        clock: Arc<dyn Clock>,
        settings: QuerySettings,
        metrics: Metrics,
    ) -> Self {
        Self {
            provider,
            clock,
            settings,
            metrics,
        }
    }

    /// Average price and spread of one instrument over the last `window_minutes`.
    ///
    /// Only invalid parameters fail; an unreachable provider gives a zero-filled
    /// summary marked [`DataStatus::Unavailable`].
    pub async fn compute_average(
        &self,
        instrument: &str,
        window_minutes: i64,
    ) -> Result<AverageReport, ValidationError> {
        self.metrics.inc_queries("average");
        let window = WindowSpec::new(window_minutes).inspect_err(|e| self.reject(e))?;

        let span = info_span!(
            "compute_average",
            request_id = %Uuid::new_v4(),
            instrument,
            window = %window
        );
        let report = async move {
            let report = self.fetch_window(instrument, window).await;
            info!(
                status = ?report.status,
                count = report.summary.count,
                average = report.summary.average,
                "Average computed"
            );
            AverageReport {
                window,
                instrument: report,
            }
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    /// Pearson correlation of exactly two distinct instruments over the last
    /// `window_minutes`, plus each side's summary.
    ///
    /// Parameters are validated before the provider is contacted. Both series
    /// are fetched concurrently.
    pub async fn compute_correlation(
        &self,
        instruments: &[String],
        window_minutes: i64,
    ) -> Result<CorrelationReport, ValidationError> {
        self.metrics.inc_queries("correlation");
        let (first, second, window) =
            validate_pair(instruments, window_minutes).inspect_err(|e| self.reject(e))?;

        let span = info_span!(
            "compute_correlation",
            request_id = %Uuid::new_v4(),
            first,
            second,
            window = %window
        );
        let report = async move {
            let (first, second) = tokio::join!(
                self.fetch_window(first, window),
                self.fetch_window(second, window)
            );

            let correlation = correlate(
                &first.price_history,
                &second.price_history,
                self.settings.alignment,
            );
            self.metrics.observe_aligned_pairs(correlation.pair_count);
            info!(
                coefficient = correlation.coefficient,
                pairs = correlation.pair_count,
                "Correlation computed"
            );

            CorrelationReport {
                window,
                correlation,
                first,
                second,
            }
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    /// Fetches, windows and summarizes one instrument. Never fails: provider
    /// errors and timeouts become an empty, `Unavailable` report.
    async fn fetch_window(&self, instrument: &str, window: WindowSpec) -> InstrumentReport {
        let fetched = {
            let _timer = self.metrics.start_fetch_timer();
            tokio::time::timeout(
                self.settings.fetch_timeout,
                self.provider.fetch_raw_series(instrument, window),
            )
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    duration_ms: self.settings.fetch_timeout.as_millis() as u64,
                })
            })
        };

        let (history, status) = match fetched {
            Ok(raw) => {
                self.metrics.inc_fetches("ok");
                let history = filter_at(&raw, window, self.clock.now());
                debug!(
                    instrument,
                    raw = raw.len(),
                    kept = history.len(),
                    "Windowed price history"
                );
                let status = if history.is_empty() {
                    DataStatus::Empty
                } else {
                    DataStatus::Available
                };
                (history, status)
            }
            Err(e) => {
                self.metrics.inc_fetches(e.outcome());
                warn!(instrument, error = %e, "Price fetch failed, continuing with empty series");
                (Vec::new(), DataStatus::Unavailable)
            }
        };

        InstrumentReport {
            instrument: instrument.to_string(),
            status,
            summary: summarize(&history),
            price_history: history,
        }
    }

    fn reject(&self, error: &ValidationError) {
        self.metrics.inc_rejected(error.reason());
        warn!(error = %error, "Query rejected");
    }
}

fn validate_pair(
    instruments: &[String],
    window_minutes: i64,
) -> Result<(&str, &str, WindowSpec), ValidationError> {
    let [first, second] = instruments else {
        return Err(ValidationError::InstrumentCount {
            count: instruments.len(),
        });
    };
    if first == second {
        return Err(ValidationError::DuplicateInstrument {
            instrument: first.clone(),
        });
    }
    let window = WindowSpec::new(window_minutes)?;
    Ok((first.as_str(), second.as_str(), window))
}
