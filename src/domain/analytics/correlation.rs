use super::alignment::AlignmentPolicy;
use super::stats::is_constant;
use crate::domain::market::{AlignedPair, Observation, chronological};
use serde::Serialize;
use std::cmp::Ordering;

/// Pearson coefficient of two aligned series, with the number of pairs it was
/// computed from. `coefficient` is 0 when the data can't support a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub coefficient: f64,
    pub pair_count: usize,
}

/// Pearson correlation coefficient of aligned pairs.
///
/// Returns 0 for fewer than two pairs or when either side has zero variance.
/// Covariance and standard deviations both use the n - 1 divisor.
pub fn correlation(pairs: &[AlignedPair]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return 0.0;
    }
    if is_constant(pairs.iter().map(|p| p.price_a)) || is_constant(pairs.iter().map(|p| p.price_b))
    {
        return 0.0;
    }

    let len = n as f64;
    let mean_a = pairs.iter().map(|p| p.price_a).sum::<f64>() / len;
    let mean_b = pairs.iter().map(|p| p.price_b).sum::<f64>() / len;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for pair in pairs {
        let diff_a = pair.price_a - mean_a;
        let diff_b = pair.price_b - mean_b;
        cov += diff_a * diff_b;
        var_a += diff_a * diff_a;
        var_b += diff_b * diff_b;
    }

    let dof = len - 1.0;
    let std_a = (var_a / dof).sqrt();
    let std_b = (var_b / dof).sqrt();
    let denom = std_a * std_b;
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }

    let r = (cov / dof) / denom;
    if r.is_nan() {
        return 0.0;
    }
    // Only rounding can push r outside [-1, 1]
    r.clamp(-1.0, 1.0)
}

/// Aligns two raw series and correlates them, independent of argument order.
///
/// Both series are sorted chronologically and the lexicographically smaller one
/// leads the alignment, so `correlate(a, b, p) == correlate(b, a, p)` exactly.
pub fn correlate(
    series_a: &[Observation],
    series_b: &[Observation],
    policy: AlignmentPolicy,
) -> CorrelationResult {
    let a = chronological(series_a);
    let b = chronological(series_b);
    let (lead, lag) = match canonical_cmp(&a, &b) {
        Ordering::Greater => (&b, &a),
        _ => (&a, &b),
    };

    let pairs = policy.align(lead, lag);
    let coefficient = correlation(&pairs);
    tracing::debug!(
        lead_len = lead.len(),
        lag_len = lag.len(),
        pairs = pairs.len(),
        coefficient,
        "Aligned series"
    );

    CorrelationResult {
        coefficient,
        pair_count: pairs.len(),
    }
}

fn canonical_cmp(a: &[Observation], b: &[Observation]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| x.chronological_cmp(y))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}
