use thiserror::Error;

/// Request parameters rejected before any data is fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Window must be a positive number of minutes, got {minutes}")]
    NonPositiveWindow { minutes: i64 },

    #[error("Window of {minutes} minutes is out of range")]
    WindowOutOfRange { minutes: i64 },

    #[error("Exactly two instruments are required, got {count}")]
    InstrumentCount { count: usize },

    #[error("Instruments must be distinct: {instrument} was given twice")]
    DuplicateInstrument { instrument: String },
}

impl ValidationError {
    /// Stable label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveWindow { .. } => "non_positive_window",
            ValidationError::WindowOutOfRange { .. } => "window_out_of_range",
            ValidationError::InstrumentCount { .. } => "instrument_count",
            ValidationError::DuplicateInstrument { .. } => "duplicate_instrument",
        }
    }
}

/// Errors raised by a price history provider.
///
/// These never reach callers of the query service: a failed fetch is
/// absorbed as an empty series and reported through logs and metrics.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request for {instrument} failed: {reason}")]
    Transport { instrument: String, reason: String },

    #[error("Provider returned HTTP {status} for {instrument}")]
    Status { instrument: String, status: u16 },

    #[error("Malformed price data for {instrument}: {reason}")]
    MalformedResponse { instrument: String, reason: String },

    #[error("Service timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl ProviderError {
    /// Metrics label for the fetch outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            ProviderError::Timeout { .. } => "timeout",
            _ => "error",
        }
    }
}
