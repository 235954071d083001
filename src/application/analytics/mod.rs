// Query orchestration over the alignment and statistics engine
pub mod price_query_service;
pub mod reports;

pub use price_query_service::{PriceQueryService, QuerySettings};
pub use reports::{AverageReport, CorrelationReport, DataStatus, InstrumentReport};
