// Average and correlation queries
pub mod analytics;
