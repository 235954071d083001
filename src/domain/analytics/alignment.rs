//! Nearest-timestamp pairing of two independently sampled price series.
//!
//! Two interchangeable implementations are provided:
//! - [`align`]: a plain O(|A|·|B|) scan. Ties go to the first candidate in B's
//!   given order. Quadratic, which is fine for window-bounded tick counts but is
//!   the known scaling limit of this module.
//! - [`align_indexed`]: sorts a copy of B by time (then price) and binary-searches
//!   it, O((|A| + |B|) log |B|). Defined to produce exactly what [`align`]
//!   produces on the sorted copy of B.

use crate::domain::market::{AlignedPair, Observation, chronological};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest timestamp gap at which two observations still count as simultaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentTolerance {
    millis: u64,
}

impl AlignmentTolerance {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self {
            millis: minutes * 60 * 1000,
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn admits(&self, gap_millis: u64) -> bool {
        gap_millis <= self.millis
    }
}

/// Which aligner implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlignmentMethod {
    #[default]
    Scan,
    Indexed,
}

impl FromStr for AlignmentMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scan" => Ok(AlignmentMethod::Scan),
            "indexed" => Ok(AlignmentMethod::Indexed),
            _ => anyhow::bail!(
                "Invalid ALIGNMENT_METHOD: {}. Must be 'scan' or 'indexed'",
                s
            ),
        }
    }
}

/// Tolerance plus implementation choice, as configured by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPolicy {
    pub tolerance: AlignmentTolerance,
    pub method: AlignmentMethod,
}

impl AlignmentPolicy {
    pub fn new(tolerance: AlignmentTolerance, method: AlignmentMethod) -> Self {
        Self { tolerance, method }
    }

    pub fn align(&self, series_a: &[Observation], series_b: &[Observation]) -> Vec<AlignedPair> {
        match self.method {
            AlignmentMethod::Scan => align(series_a, series_b, self.tolerance),
            AlignmentMethod::Indexed => align_indexed(series_a, series_b, self.tolerance),
        }
    }
}

/// Pairs every observation of `series_a` with its nearest neighbour in `series_b`,
/// keeping the pair only when the gap is within `tolerance`.
///
/// Output follows `series_a`'s order. Each A observation yields at most one pair;
/// B observations may be reused.
pub fn align(
    series_a: &[Observation],
    series_b: &[Observation],
    tolerance: AlignmentTolerance,
) -> Vec<AlignedPair> {
    series_a
        .iter()
        .filter_map(|a| {
            nearest_by_scan(a, series_b)
                .filter(|(_, gap)| tolerance.admits(*gap))
                .map(|(b, _)| AlignedPair::new(a.price, b.price))
        })
        .collect()
}

/// Same contract as [`align`], evaluated against `series_b` sorted chronologically.
pub fn align_indexed(
    series_a: &[Observation],
    series_b: &[Observation],
    tolerance: AlignmentTolerance,
) -> Vec<AlignedPair> {
    let sorted_b = chronological(series_b);
    series_a
        .iter()
        .filter_map(|a| {
            nearest_in_sorted(a, &sorted_b)
                .filter(|(_, gap)| tolerance.admits(*gap))
                .map(|(b, _)| AlignedPair::new(a.price, b.price))
        })
        .collect()
}

fn nearest_by_scan<'a>(
    target: &Observation,
    candidates: &'a [Observation],
) -> Option<(&'a Observation, u64)> {
    let mut best: Option<(&Observation, u64)> = None;
    for candidate in candidates {
        let gap = target.gap_millis(candidate);
        // strict: an equal gap never displaces an earlier candidate
        if best.is_none_or(|(_, best_gap)| gap < best_gap) {
            best = Some((candidate, gap));
        }
    }
    best
}

/// `sorted` must be ordered by [`Observation::chronological_cmp`].
fn nearest_in_sorted<'a>(
    target: &Observation,
    sorted: &'a [Observation],
) -> Option<(&'a Observation, u64)> {
    let t = target.timestamp_millis();
    let split = sorted.partition_point(|o| o.timestamp_millis() < t);

    // First element of the millisecond group just before `t`, i.e. the one a
    // front-to-back scan would meet first among equally distant candidates.
    let before = split.checked_sub(1).map(|last| {
        let ts = sorted[last].timestamp_millis();
        &sorted[sorted.partition_point(|o| o.timestamp_millis() < ts)]
    });
    let after = sorted.get(split);

    match (before, after) {
        (Some(b), Some(a)) => {
            let (gap_b, gap_a) = (target.gap_millis(b), target.gap_millis(a));
            if gap_b <= gap_a {
                Some((b, gap_b))
            } else {
                Some((a, gap_a))
            }
        }
        (Some(b), None) => Some((b, target.gap_millis(b))),
        (None, Some(a)) => Some((a, target.gap_millis(a))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(price: f64, millis: i64) -> Observation {
        Observation::new(price, Utc.timestamp_millis_opt(millis).unwrap())
    }

    fn both(a: &[Observation], b: &[Observation], tol: u64) -> (Vec<AlignedPair>, Vec<AlignedPair>) {
        let tolerance = AlignmentTolerance::from_millis(tol);
        (align(a, b, tolerance), align_indexed(a, b, tolerance))
    }

    #[test]
    fn test_only_first_observation_aligns() {
        let a = vec![obs(1.0, 0), obs(2.0, 100)];
        let b = vec![obs(10.0, 5), obs(20.0, 200)];

        let (scan, indexed) = both(&a, &b, 10);
        assert_eq!(scan, vec![AlignedPair::new(1.0, 10.0)]);
        assert_eq!(indexed, scan);
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let a = vec![obs(1.0, 1_000)];
        let b = vec![obs(7.0, 1_010)];

        let (scan, indexed) = both(&a, &b, 10);
        assert_eq!(scan.len(), 1);
        assert_eq!(indexed.len(), 1);

        let (scan, indexed) = both(&a, &b, 9);
        assert!(scan.is_empty());
        assert!(indexed.is_empty());
    }

    #[test]
    fn test_picks_nearest_not_first() {
        let a = vec![obs(1.0, 1_000)];
        let b = vec![obs(10.0, 1_400), obs(20.0, 1_050), obs(30.0, 900)];

        let (scan, indexed) = both(&a, &b, 1_000);
        assert_eq!(scan, vec![AlignedPair::new(1.0, 20.0)]);
        assert_eq!(indexed, scan);
    }

    #[test]
    fn test_scan_tie_goes_to_first_in_given_order() {
        let a = vec![obs(1.0, 1_000)];
        let b = vec![obs(50.0, 1_100), obs(40.0, 900)];

        let scan = align(&a, &b, AlignmentTolerance::from_millis(500));
        assert_eq!(scan, vec![AlignedPair::new(1.0, 50.0)]);
    }

    #[test]
    fn test_indexed_tie_goes_to_earlier_timestamp() {
        let a = vec![obs(1.0, 1_000)];
        let b = vec![obs(50.0, 1_100), obs(40.0, 900), obs(30.0, 900)];

        let indexed = align_indexed(&a, &b, AlignmentTolerance::from_millis(500));
        assert_eq!(indexed, vec![AlignedPair::new(1.0, 30.0)]);

        let scan_on_sorted = align(&a, &chronological(&b), AlignmentTolerance::from_millis(500));
        assert_eq!(indexed, scan_on_sorted);
    }

    #[test]
    fn test_counterparts_are_reused() {
        let a = vec![obs(1.0, 0), obs(2.0, 10), obs(3.0, 20)];
        let b = vec![obs(100.0, 10)];

        let (scan, indexed) = both(&a, &b, 10);
        assert_eq!(
            scan,
            vec![
                AlignedPair::new(1.0, 100.0),
                AlignedPair::new(2.0, 100.0),
                AlignedPair::new(3.0, 100.0),
            ]
        );
        assert_eq!(indexed, scan);
    }

    #[test]
    fn test_output_follows_series_a_order() {
        let a = vec![obs(3.0, 300), obs(1.0, 100), obs(2.0, 200)];
        let b = vec![obs(20.0, 200), obs(10.0, 100), obs(30.0, 300)];

        let (scan, indexed) = both(&a, &b, 0);
        let firsts: Vec<f64> = scan.iter().map(|p| p.price_a).collect();
        assert_eq!(firsts, vec![3.0, 1.0, 2.0]);
        assert_eq!(indexed, scan);
    }

    #[test]
    fn test_empty_inputs() {
        let a = vec![obs(1.0, 0)];
        let (scan, indexed) = both(&a, &[], 1_000);
        assert!(scan.is_empty());
        assert!(indexed.is_empty());

        let (scan, indexed) = both(&[], &a, 1_000);
        assert!(scan.is_empty());
        assert!(indexed.is_empty());
    }

    #[test]
    fn test_policy_dispatch_and_parsing() {
        assert_eq!("Indexed".parse::<AlignmentMethod>().unwrap(), AlignmentMethod::Indexed);
        assert!("nearest".parse::<AlignmentMethod>().is_err());

        let policy = AlignmentPolicy::new(
            AlignmentTolerance::from_minutes(10),
            AlignmentMethod::Indexed,
        );
        assert_eq!(policy.tolerance.as_millis(), 600_000);

        let a = vec![obs(1.0, 0), obs(2.0, 60_000)];
        let b = vec![obs(5.0, 30_000)];
        assert_eq!(policy.align(&a, &b).len(), 2);
    }
}
