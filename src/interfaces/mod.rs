// Response bodies for the CLI front end
pub mod responses;

pub use responses::{AverageResponse, CorrelationResponse, StockEntry, Stocks};
