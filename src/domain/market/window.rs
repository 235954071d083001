use super::observation::{Observation, Series};
use crate::domain::errors::ValidationError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Trailing time span, in whole minutes, that bounds which observations count
/// as current. Only constructible through validation, so it is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WindowSpec {
    minutes: u32,
}

impl WindowSpec {
    pub fn new(minutes: i64) -> Result<Self, ValidationError> {
        if minutes <= 0 {
            return Err(ValidationError::NonPositiveWindow { minutes });
        }
        let minutes =
            u32::try_from(minutes).map_err(|_| ValidationError::WindowOutOfRange { minutes })?;
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// Oldest instant still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes)
    }
}

/// Keeps observations with `observed_at >= now - window`, preserving input order.
pub fn filter_at(series: &[Observation], window: WindowSpec, now: DateTime<Utc>) -> Series {
    let cutoff = window.cutoff(now);
    series
        .iter()
        .filter(|obs| obs.observed_at >= cutoff)
        .copied()
        .collect()
}

/// [`filter_at`] against the wall clock.
pub fn filter(series: &[Observation], window: WindowSpec) -> Series {
    filter_at(series, window, Utc::now())
}
