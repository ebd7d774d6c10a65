//! Public entry points of the Jelinski-Moranda estimator.
//!
//! Example
//! ```
//! use RustedReliability::numerical::JM::JM_api::estimate;
//! let intervals = vec![
//!     7.0, 10.0, 12.0, 6.0, 7.0, 3.0, 5.0, 9.0, 5.0, 7.0, 2.0, 6.0, 1.0, 8.0, 3.0, 1.0, 2.0, 3.0,
//!     5.0, 1.0, 84.0, 30.0, 7.0, 3.0, 1.0,
//! ];
//! let result = estimate(&intervals, 1e-10, 200).unwrap();
//! assert!(result.converged);
//! assert!(result.b_hat > 25.0);
//! println!("B = {}, K = {}, X_next = {}", result.b_hat, result.k_hat, result.x_next);
//! ```
use crate::numerical::JM::JM_metrics::derive_metrics;
use crate::numerical::JM::JM_newton::{StopReason, solve_b_newton};
use log::{info, warn};
use std::error::Error;
use std::fmt;
use strum_macros::{Display, EnumIter};

pub const DEFAULT_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Derived quantity whose denominator collapsed to (numerical) zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum DegenerateQuantity {
    #[strum(serialize = "K_hat")]
    KHat,
    #[strum(serialize = "X_next")]
    XNext,
    #[strum(serialize = "time_to_finish")]
    TimeToFinish,
}

/// Error types of the estimator
///
/// Non-convergence is not an error: it is reported by `EstimationResult::converged`
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    InvalidArgument(String),
    DegenerateEstimate(DegenerateQuantity),
}

impl fmt::Display for EstimationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EstimationError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            EstimationError::DegenerateEstimate(quantity) => {
                write!(f, "Degenerate estimate: {} is undefined", quantity)
            }
        }
    }
}

impl Error for EstimationError {}

/// Configuration of the Newton solver
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = max_iterations;
    }

    pub fn validate(&self) -> Result<(), EstimationError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EstimationError::InvalidArgument(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(EstimationError::InvalidArgument(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Estimate of the Jelinski-Moranda model parameters and derived metrics
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    /// number of observed intervals
    pub n: usize,
    /// estimated total number of defects
    pub b_hat: f64,
    /// estimated per-defect detection rate
    pub k_hat: f64,
    /// expected time until the next defect, `f64::INFINITY` when no defects remain
    pub x_next: f64,
    /// expected remaining testing time
    pub time_to_finish: f64,
    /// Newton steps consumed
    pub iterations: usize,
    /// a stopping criterion was met; a finite root of the likelihood equation need not exist
    pub converged: bool,
    /// b_hat - n
    pub remaining: f64,
    /// value of the likelihood equation at b_hat
    pub residual: f64,
    /// size of the last Newton step, None if the first point already satisfied the residual test
    pub last_step: Option<f64>,
    pub stop_reason: StopReason,
}

impl EstimationResult {
    /// x_next and time_to_finish are only trustworthy for a converged estimate with defects left
    pub fn is_reliable(&self) -> bool {
        self.converged && self.remaining > 0.0
    }
}

/// Estimate with explicit tolerance and iteration budget
pub fn estimate(
    observations: &[f64],
    tolerance: f64,
    max_iterations: usize,
) -> Result<EstimationResult, EstimationError> {
    estimate_with_config(observations, &SolverConfig::new(tolerance, max_iterations))
}

/// Estimate with tolerance 1e-10 and 200 iterations
pub fn estimate_default(observations: &[f64]) -> Result<EstimationResult, EstimationError> {
    estimate_with_config(observations, &SolverConfig::default())
}

pub fn estimate_with_config(
    observations: &[f64],
    config: &SolverConfig,
) -> Result<EstimationResult, EstimationError> {
    config.validate()?;
    let outcome = solve_b_newton(observations, config.tolerance, config.max_iterations)?;
    if !outcome.converged {
        warn!(
            "Newton iteration stopped after {} steps without convergence, B = {}, f(B) = {:.3e}",
            outcome.iterations, outcome.b_hat, outcome.residual
        );
    }
    let metrics = derive_metrics(
        observations.len(),
        outcome.b_hat,
        outcome.weighted_sum,
        outcome.interval_sum,
    )?;
    info!(
        "n = {}, B = {:.6}, K = {:.6e}, X_next = {:.6}, T_finish = {:.6} ({} iterations, {})",
        observations.len(),
        outcome.b_hat,
        metrics.k_hat,
        metrics.x_next,
        metrics.time_to_finish,
        outcome.iterations,
        outcome.stop_reason
    );
    Ok(EstimationResult {
        n: observations.len(),
        b_hat: outcome.b_hat,
        k_hat: metrics.k_hat,
        x_next: metrics.x_next,
        time_to_finish: metrics.time_to_finish,
        iterations: outcome.iterations,
        converged: outcome.converged,
        remaining: metrics.remaining,
        residual: outcome.residual,
        last_step: outcome.last_step,
        stop_reason: outcome.stop_reason,
    })
}
