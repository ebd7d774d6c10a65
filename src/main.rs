#![allow(non_snake_case)]
use RustedReliability::Utils::logger::init_logger;
use RustedReliability::numerical::JM::JM_batch::{estimate_batch, report_table, save_reports_to_csv};
use RustedReliability::numerical::JM::JM_task::EstimationTask;
use log::{error, info};
use std::process;

/// usage: RustedReliability [task_file]
/// without a task file the five course variants are evaluated
fn main() {
    let task = match std::env::args().nth(1) {
        Some(path) => EstimationTask::from_file(&path),
        None => EstimationTask::course_variants(),
    };
    let task = match task {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Err(e) = init_logger(task.loglevel.as_deref(), task.log_to_file) {
        eprintln!("{}", e);
        process::exit(1);
    }
    info!(
        "Jelinski-Moranda estimation: tolerance {:e}, at most {} iterations",
        task.solver.tolerance, task.solver.max_iterations
    );

    let reports = estimate_batch(&task.variants, &task.solver);
    println!("\n### Jelinski-Moranda model results\n");
    println!("{}", report_table(&reports));

    if let Some(path) = &task.csv_output {
        match save_reports_to_csv(&reports, path) {
            Ok(()) => info!("results saved to {}", path),
            Err(e) => {
                error!("cannot save results to {}: {}", path, e);
                process::exit(1);
            }
        }
    }
}
