// Alignment and statistics engine
pub mod analytics;

// Observations, series and time windows
pub mod market;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
