//! Metrics for the query service.
//!
//! Nothing here listens on a port: the registry is rendered on demand in
//! Prometheus text format and handed to whoever wants to print or push it.

pub mod metrics;

pub use metrics::Metrics;
