//! Newton's method for the maximum likelihood estimate of the total defect count B
//! in the Jelinski-Moranda model.
//!
//! The estimating equation is
//! ```text
//! f(B) = sum_i 1/(B - i + 1) - n*Sx / sum_i (B - i + 1)*X_i = 0,   i = 1..n
//! f'(B) = -sum_i 1/(B - i + 1)^2 + n*Sx^2 / (sum_i (B - i + 1)*X_i)^2
//! ```
//! where X_i is the i-th interval between defects and Sx = sum_i X_i.
//! f is singular at B = i - 1, so every iterate is kept strictly above n.
use crate::numerical::JM::JM_api::EstimationError;
use log::{debug, warn};
use strum_macros::Display;

/// B_0 = n + 1 + START_OFFSET. Dimensionless, so rescaling the intervals leaves the iterates unchanged
const START_OFFSET: f64 = 1.0;
/// lower bound for |f'(B)|
const MIN_DERIVATIVE: f64 = 1e-16;
/// second stopping criterion, independent of the residual
const STEP_TOLERANCE: f64 = 1e-12;
/// a step that lands at B <= n is replaced by the midpoint of B and n + DOMAIN_EPS
const DOMAIN_EPS: f64 = 1.0;

/// Criterion that ended the iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StopReason {
    #[strum(serialize = "residual")]
    Residual,
    #[strum(serialize = "step size")]
    StepSize,
    #[strum(serialize = "max iterations")]
    MaxIterations,
}

/// Result of the Newton iteration
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonOutcome {
    pub b_hat: f64,
    pub iterations: usize,
    pub converged: bool,
    /// f(b_hat)
    pub residual: f64,
    pub last_step: Option<f64>,
    pub stop_reason: StopReason,
    /// S2(b_hat) = sum_i (b_hat - i + 1)*X_i
    pub weighted_sum: f64,
    /// Sx = sum_i X_i
    pub interval_sum: f64,
    /// steps taken with |f'(B)| raised to 1e-16
    pub clamped_derivatives: usize,
    /// Newton steps replaced by bisection back into B > n
    pub bisections: usize,
}

/// Likelihood equation with the sums that do not depend on B precomputed
struct LikelihoodEquation<'a> {
    observations: &'a [f64],
    n: f64,
    sum_x: f64,
}

impl<'a> LikelihoodEquation<'a> {
    fn new(observations: &'a [f64]) -> Self {
        Self {
            observations,
            n: observations.len() as f64,
            sum_x: observations.iter().sum(),
        }
    }

    /// f(B) together with S2(B) = sum_i (B - i + 1)*X_i, one pass over the data
    fn value_and_weighted_sum(&self, b: f64) -> (f64, f64) {
        let mut reciprocal_sum = 0.0;
        let mut s2 = 0.0;
        // zero-based index k corresponds to i = k + 1, so B - i + 1 = B - k
        for (k, &x) in self.observations.iter().enumerate() {
            let denom = b - k as f64;
            reciprocal_sum += 1.0 / denom;
            s2 += denom * x;
        }
        (reciprocal_sum - self.n * self.sum_x / s2, s2)
    }

    /// f'(B), reusing S2(B) from the value pass
    fn derivative(&self, b: f64, s2: f64) -> f64 {
        let squared_sum: f64 = (0..self.observations.len())
            .map(|k| {
                let denom = b - k as f64;
                1.0 / (denom * denom)
            })
            .sum();
        -squared_sum + self.n * self.sum_x * self.sum_x / (s2 * s2)
    }
}

/// Every interval must be a positive finite number and there must be at least one
pub fn validate_observations(observations: &[f64]) -> Result<(), EstimationError> {
    if observations.is_empty() {
        return Err(EstimationError::InvalidArgument(
            "at least one observation required".to_string(),
        ));
    }
    if let Some((i, x)) = observations
        .iter()
        .enumerate()
        .find(|(_, x)| !(x.is_finite() && **x > 0.0))
    {
        return Err(EstimationError::InvalidArgument(format!(
            "interval #{} must be a positive finite number, got {}",
            i + 1,
            x
        )));
    }
    Ok(())
}

/// Starting point of the iteration
pub fn initial_guess(n: usize) -> f64 {
    n as f64 + 1.0 + START_OFFSET
}

/// S2(B) = sum_i (B - i + 1)*X_i
pub fn weighted_interval_sum(observations: &[f64], b: f64) -> f64 {
    observations
        .iter()
        .enumerate()
        .map(|(k, &x)| (b - k as f64) * x)
        .sum()
}

/// Value of the likelihood equation f(B), for diagnostics
pub fn likelihood_equation(observations: &[f64], b: f64) -> f64 {
    LikelihoodEquation::new(observations)
        .value_and_weighted_sum(b)
        .0
}

/// Solve f(B) = 0 by Newton's method, keeping every iterate above n.
/// Stops when |f(B)| < tolerance or when the step is below 1e-12;
/// after max_iterations the last point is returned with converged = false.
pub fn solve_b_newton(
    observations: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<NewtonOutcome, EstimationError> {
    validate_observations(observations)?;
    let equation = LikelihoodEquation::new(observations);
    let n = equation.n;
    let mut b = initial_guess(observations.len());
    let mut last_step: Option<f64> = None;
    let mut clamped_derivatives = 0;
    let mut bisections = 0;

    for iteration in 1..=max_iterations {
        let (f_val, s2) = equation.value_and_weighted_sum(b);
        debug!("iteration {}: B = {:.12}, f(B) = {:.3e}", iteration, b, f_val);

        if f_val.abs() < tolerance {
            return Ok(NewtonOutcome {
                b_hat: b,
                iterations: iteration,
                converged: true,
                residual: f_val,
                last_step,
                stop_reason: StopReason::Residual,
                weighted_sum: s2,
                interval_sum: equation.sum_x,
                clamped_derivatives,
                bisections,
            });
        }

        let mut f_prime = equation.derivative(b, s2);
        if f_prime.abs() < MIN_DERIVATIVE {
            let clamped = if f_prime < 0.0 {
                -MIN_DERIVATIVE
            } else {
                MIN_DERIVATIVE
            };
            warn!(
                "iteration {}: derivative {:.3e} clamped to {:.0e}",
                iteration, f_prime, clamped
            );
            f_prime = clamped;
            clamped_derivatives += 1;
        }

        let mut b_new = b - f_val / f_prime;
        if !b_new.is_finite() || b_new <= n {
            let bisected = 0.5 * (b + n + DOMAIN_EPS);
            warn!(
                "iteration {}: Newton step to B = {} left the domain B > {}, bisecting to {}",
                iteration, b_new, n, bisected
            );
            b_new = bisected;
            bisections += 1;
        }

        let step = (b_new - b).abs();
        last_step = Some(step);
        if step < STEP_TOLERANCE {
            let (residual, weighted_sum) = equation.value_and_weighted_sum(b_new);
            return Ok(NewtonOutcome {
                b_hat: b_new,
                iterations: iteration,
                converged: true,
                residual,
                last_step,
                stop_reason: StopReason::StepSize,
                weighted_sum,
                interval_sum: equation.sum_x,
                clamped_derivatives,
                bisections,
            });
        }
        b = b_new;
    }

    let (residual, weighted_sum) = equation.value_and_weighted_sum(b);
    Ok(NewtonOutcome {
        b_hat: b,
        iterations: max_iterations,
        converged: false,
        residual,
        last_step,
        stop_reason: StopReason::MaxIterations,
        weighted_sum,
        interval_sum: equation.sum_x,
        clamped_derivatives,
        bisections,
    })
}
