use crate::domain::analytics::{CorrelationResult, StatSummary};
use crate::domain::market::{Series, WindowSpec};
use serde::Serialize;

/// Whether an instrument's numbers are backed by data.
///
/// Separates "the provider had no ticks in the window" from "the provider
/// could not be reached", which both produce a zero-filled summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataStatus {
    Available,
    Empty,
    Unavailable,
}

/// One instrument's windowed history and its summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentReport {
    pub instrument: String,
    pub status: DataStatus,
    pub summary: StatSummary,
    pub price_history: Series,
}

#[derive(Debug, Clone, Serialize)]
pub struct AverageReport {
    pub window: WindowSpec,
    pub instrument: InstrumentReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub window: WindowSpec,
    pub correlation: CorrelationResult,
    pub first: InstrumentReport,
    pub second: InstrumentReport,
}
