use crate::domain::market::Observation;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary statistics of one (already windowed) price series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    pub average: f64,
    pub sample_std_dev: f64,
    pub count: usize,
}

/// Arithmetic mean of the prices, 0 for an empty series.
pub fn average(series: &[Observation]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(|obs| obs.price).mean()
}

/// Sample standard deviation (n - 1 divisor), 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 || is_constant(values.iter().copied()) {
        return 0.0;
    }
    values.iter().std_dev()
}

pub fn summarize(series: &[Observation]) -> StatSummary {
    let prices: Vec<f64> = series.iter().map(|obs| obs.price).collect();
    StatSummary {
        average: average(series),
        sample_std_dev: sample_std_dev(&prices),
        count: series.len(),
    }
}

/// True when every value is identical. Checked on the raw values so rounding in
/// a computed mean can't turn a flat series into a tiny non-zero variance.
pub(crate) fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}
