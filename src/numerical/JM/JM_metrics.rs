//! Reliability metrics derived from the estimate of B:
//! defect detection rate K, expected time to the next defect and expected time to finish testing.
use crate::numerical::JM::JM_api::{DegenerateQuantity, EstimationError};

/// up to this many terms the harmonic number is summed directly
const HARMONIC_EXACT_TERMS: f64 = 1e6;
/// Euler-Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub k_hat: f64,
    pub remaining: f64,
    pub x_next: f64,
    pub time_to_finish: f64,
}

/// H_m = sum_{k=1}^{m} 1/k. Large m uses ln m + gamma + 1/(2m) - 1/(12m^2)
pub fn harmonic_number(m: f64) -> f64 {
    if m <= HARMONIC_EXACT_TERMS {
        let terms = m as u64;
        // smallest terms first
        (1..=terms).rev().map(|k| 1.0 / k as f64).sum()
    } else {
        m.ln() + EULER_GAMMA + 1.0 / (2.0 * m) - 1.0 / (12.0 * m * m)
    }
}

/// m = max(n + 1, ceil(B)) - n, the number of defects still to be found, at least 1
pub fn remaining_defect_count(n: usize, b_hat: f64) -> f64 {
    let n = n as f64;
    b_hat.ceil().max(n + 1.0) - n
}

/// K = n / S2(B), with S2(B) = sum_i (B - i + 1)*X_i taken from the solver
pub fn defect_rate(n: usize, weighted_sum: f64, interval_sum: f64) -> Result<f64, EstimationError> {
    let s2 = weighted_sum;
    if !s2.is_finite() || s2.abs() <= f64::EPSILON * interval_sum {
        return Err(EstimationError::DegenerateEstimate(DegenerateQuantity::KHat));
    }
    let k_hat = n as f64 / s2;
    if !(k_hat.is_finite() && k_hat > 0.0) {
        return Err(EstimationError::DegenerateEstimate(DegenerateQuantity::KHat));
    }
    Ok(k_hat)
}

/// X_next = 1/(K*(B - n)), infinite when no defects remain
pub fn time_to_next_defect(k_hat: f64, remaining: f64) -> Result<f64, EstimationError> {
    if remaining <= 0.0 {
        return Ok(f64::INFINITY);
    }
    let rate = k_hat * remaining;
    let x_next = 1.0 / rate;
    if !(rate > 0.0 && x_next.is_finite()) {
        return Err(EstimationError::DegenerateEstimate(DegenerateQuantity::XNext));
    }
    Ok(x_next)
}

/// H_m / K
pub fn time_to_finish(n: usize, b_hat: f64, k_hat: f64) -> Result<f64, EstimationError> {
    if !b_hat.is_finite() {
        return Err(EstimationError::DegenerateEstimate(
            DegenerateQuantity::TimeToFinish,
        ));
    }
    let m = remaining_defect_count(n, b_hat);
    let t = harmonic_number(m) / k_hat;
    if !(t.is_finite() && t >= 0.0) {
        return Err(EstimationError::DegenerateEstimate(
            DegenerateQuantity::TimeToFinish,
        ));
    }
    Ok(t)
}

/// Metrics at the estimate b_hat; weighted_sum is S2(b_hat) and interval_sum is Sx
pub fn derive_metrics(
    n: usize,
    b_hat: f64,
    weighted_sum: f64,
    interval_sum: f64,
) -> Result<DerivedMetrics, EstimationError> {
    let k_hat = defect_rate(n, weighted_sum, interval_sum)?;
    let remaining = b_hat - n as f64;
    let x_next = time_to_next_defect(k_hat, remaining)?;
    let time_to_finish = time_to_finish(n, b_hat, k_hat)?;
    Ok(DerivedMetrics {
        k_hat,
        remaining,
        x_next,
        time_to_finish,
    })
}
