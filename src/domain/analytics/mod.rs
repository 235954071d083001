//! Alignment and statistics engine.
//!
//! Everything here is pure and synchronous: no clocks, no I/O.

pub mod alignment;
pub mod correlation;
pub mod stats;

pub use alignment::{
    AlignmentMethod, AlignmentPolicy, AlignmentTolerance, align, align_indexed,
};
pub use correlation::{CorrelationResult, correlate, correlation};
pub use stats::{StatSummary, average, sample_std_dev, summarize};
