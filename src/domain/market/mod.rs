pub mod observation;
pub mod window;

pub use observation::{AlignedPair, Observation, Series, chronological};
pub use window::{WindowSpec, filter, filter_at};
