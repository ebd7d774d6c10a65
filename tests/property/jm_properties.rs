use RustedReliability::numerical::JM::JM_api::{EstimationError, estimate, estimate_default};
use RustedReliability::numerical::JM::JM_newton::{StopReason, likelihood_equation};
use proptest::prelude::*;

fn intervals() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1f64..100.0, 2..40)
}

proptest! {
    #[test]
    fn terminates_within_budget(xs in intervals(), max_iterations in 1usize..300) {
        let result = estimate(&xs, 1e-10, max_iterations).unwrap();
        prop_assert!(result.iterations >= 1 && result.iterations <= max_iterations);
        prop_assert_eq!(result.n, xs.len());
    }

    #[test]
    fn converged_result_satisfies_stopping_criterion(xs in intervals()) {
        let result = estimate_default(&xs).unwrap();
        if result.converged {
            let f = likelihood_equation(&xs, result.b_hat);
            prop_assert!(
                f.abs() < 1e-10 || result.last_step.is_some_and(|s| s < 1e-12),
                "f(B) = {}, last step = {:?}", f, result.last_step
            );
            prop_assert_ne!(result.stop_reason, StopReason::MaxIterations);
        }
    }

    #[test]
    fn estimate_stays_in_domain(xs in intervals(), max_iterations in 1usize..50) {
        let n = xs.len() as f64;
        let result = estimate(&xs, 1e-10, max_iterations).unwrap();
        prop_assert!(result.b_hat > n);
        prop_assert!(result.k_hat > 0.0);
        prop_assert!(result.remaining > 0.0);
        prop_assert!(result.x_next.is_finite() && result.x_next > 0.0);
        prop_assert!(result.time_to_finish.is_finite() && result.time_to_finish > 0.0);
    }

    #[test]
    fn power_of_two_scaling(xs in intervals(), k in -3i32..4) {
        let c = 2f64.powi(k);
        let scaled: Vec<f64> = xs.iter().map(|x| x * c).collect();
        let base = estimate_default(&xs).unwrap();
        let result = estimate_default(&scaled).unwrap();
        prop_assert_eq!(result.b_hat, base.b_hat);
        prop_assert_eq!(result.iterations, base.iterations);
        prop_assert!(((result.k_hat - base.k_hat / c) / result.k_hat).abs() < 1e-12);
    }

    #[test]
    fn reruns_are_identical(xs in intervals()) {
        prop_assert_eq!(estimate_default(&xs), estimate_default(&xs));
    }

    #[test]
    fn non_positive_interval_rejected(mut xs in intervals(), idx in 0usize..40, bad in -10.0f64..=0.0) {
        let idx = idx % xs.len();
        xs[idx] = bad;
        let is_invalid_argument = matches!(estimate_default(&xs), Err(EstimationError::InvalidArgument(_)));
        prop_assert!(is_invalid_argument);
    }
}
