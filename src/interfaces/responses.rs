//! JSON response bodies in the shape the stock price service has always
//! returned (`averageStockPrice`, `priceHistory`, `stocks`), with the extra
//! status and pair-count fields added alongside.

use crate::application::analytics::{AverageReport, CorrelationReport, DataStatus, InstrumentReport};
use crate::domain::market::Series;
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageResponse {
    pub average_stock_price: f64,
    pub price_history: Series,
    pub status: DataStatus,
}

impl From<&AverageReport> for AverageResponse {
    fn from(report: &AverageReport) -> Self {
        Self {
            average_stock_price: report.instrument.summary.average,
            price_history: report.instrument.price_history.clone(),
            status: report.instrument.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub average_price: f64,
    pub price_history: Series,
    pub status: DataStatus,
}

impl From<&InstrumentReport> for StockEntry {
    fn from(report: &InstrumentReport) -> Self {
        Self {
            average_price: report.summary.average,
            price_history: report.price_history.clone(),
            status: report.status,
        }
    }
}

/// Per-ticker entries, serialized as a JSON object in request order
#[derive(Debug)]
pub struct Stocks(pub Vec<(String, StockEntry)>);

impl Serialize for Stocks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, entry)| (name, entry)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResponse {
    pub correlation: f64,
    pub pair_count: usize,
    pub stocks: Stocks,
}

impl From<&CorrelationReport> for CorrelationResponse {
    fn from(report: &CorrelationReport) -> Self {
        let stocks = [&report.first, &report.second]
            .into_iter()
            .map(|side| (side.instrument.clone(), StockEntry::from(side)))
            .collect();

        Self {
            correlation: report.correlation.coefficient,
            pair_count: report.correlation.pair_count,
            stocks: Stocks(stocks),
        }
    }
}
