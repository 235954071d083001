use crate::domain::errors::ProviderError;
use crate::domain::market::{Observation, Series};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

// ===== Wire Types =====

#[derive(Debug, Deserialize, Clone)]
pub struct PricePoint {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt")]
    pub last_updated_at: DateTime<Utc>,
}

impl From<PricePoint> for Observation {
    fn from(point: PricePoint) -> Self {
        Observation::new(point.price, point.last_updated_at)
    }
}

/// Shape returned when the provider only knows the latest price
#[derive(Debug, Deserialize)]
pub struct CurrentPrice {
    pub stock: PricePoint,
}

/// Normalizes a provider response body into a series.
///
/// The provider answers either with a list of price points or with a single
/// `{"stock": {...}}` object. Any other JSON shape means no data. A body of the
/// right shape with bad fields is an error.
pub fn normalize_response(instrument: &str, body: Value) -> Result<Series, ProviderError> {
    let malformed = |e: serde_json::Error| ProviderError::MalformedResponse {
        instrument: instrument.to_string(),
        reason: e.to_string(),
    };

    match body {
        Value::Array(_) => {
            let points: Vec<PricePoint> = serde_json::from_value(body).map_err(malformed)?;
            Ok(points.into_iter().map(Observation::from).collect())
        }
        Value::Object(_) if body.get("stock").is_some() => {
            let current: CurrentPrice = serde_json::from_value(body).map_err(malformed)?;
            Ok(vec![current.stock.into()])
        }
        _ => Ok(Vec::new()),
    }
}
