//! Numerical estimators of software reliability
///  Example#1
/// ```
///  use RustedReliability::numerical::JM::JM_api::{estimate_with_config, SolverConfig};
///  // intervals between detected defects, hours
///  let intervals = vec![9.0, 12.0, 11.0, 4.0, 7.0, 2.0, 5.0, 8.0, 5.0, 7.0, 1.0, 6.0, 1.0,
///      9.0, 4.0, 1.0, 3.0, 3.0, 6.0, 1.0, 1.0, 11.0, 33.0, 7.0, 91.0, 2.0];
///  let config = SolverConfig::new(1e-10, 200);
///  let result = estimate_with_config(&intervals, &config).unwrap();
///  if result.is_reliable() {
///      println!("B = {}, X_next = {}, T_finish = {}", result.b_hat, result.x_next, result.time_to_finish);
///  }
/// ```
/// Example#2
/// ```
///  // batch evaluation of the course variants
///  use RustedReliability::numerical::JM::JM_batch::{estimate_batch, report_table};
///  use RustedReliability::numerical::JM::JM_task::EstimationTask;
///  let task = EstimationTask::course_variants().unwrap();
///  let reports = estimate_batch(&task.variants, &task.solver);
///  println!("{}", report_table(&reports));
/// ```
pub mod JM;
