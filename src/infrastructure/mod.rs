pub mod clock;
pub mod core;
pub mod mock;
pub mod observability;
pub mod price_api;

pub use clock::{FixedClock, SystemClock};
pub use mock::MockPriceProvider;
pub use price_api::HttpPriceProvider;
