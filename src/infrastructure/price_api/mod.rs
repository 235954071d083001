pub mod client;
pub mod common;

pub use client::HttpPriceProvider;
pub use common::normalize_response;
