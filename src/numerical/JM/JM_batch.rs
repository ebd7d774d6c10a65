//! Evaluation of many interval sequences at once and reporting of the estimates.
use crate::Utils::logger::save_table_to_csv;
use crate::numerical::JM::JM_api::{
    EstimationError, EstimationResult, SolverConfig, estimate_with_config,
};
use crate::numerical::JM::JM_task::Variant;
use rayon::prelude::*;
use std::io;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq)]
pub struct VariantReport {
    pub name: String,
    pub outcome: Result<EstimationResult, EstimationError>,
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Variant")]
    name: String,
    #[tabled(rename = "n")]
    n: String,
    #[tabled(rename = "B (total defects)")]
    b_hat: String,
    #[tabled(rename = "K (rate)")]
    k_hat: String,
    #[tabled(rename = "X_next")]
    x_next: String,
    #[tabled(rename = "T_finish")]
    time_to_finish: String,
    #[tabled(rename = "Iter")]
    iterations: String,
    #[tabled(rename = "Status")]
    status: String,
}

const CSV_HEADERS: [&str; 9] = [
    "variant",
    "n",
    "b_hat",
    "k_hat",
    "x_next",
    "time_to_finish",
    "iterations",
    "converged",
    "error",
];

/// Estimate every variant in parallel; reports come back in input order
pub fn estimate_batch(variants: &[Variant], config: &SolverConfig) -> Vec<VariantReport> {
    variants
        .par_iter()
        .map(|variant| VariantReport {
            name: variant.name.clone(),
            outcome: estimate_with_config(&variant.intervals, config),
        })
        .collect()
}

fn status(result: &EstimationResult) -> String {
    if !result.converged {
        format!("not converged ({})", result.stop_reason)
    } else if result.remaining <= 0.0 {
        "no defects left".to_string()
    } else {
        "converged".to_string()
    }
}

impl VariantReport {
    fn row(&self) -> ReportRow {
        match &self.outcome {
            Ok(r) => ReportRow {
                name: self.name.clone(),
                n: r.n.to_string(),
                b_hat: format!("{:.4}", r.b_hat),
                k_hat: format!("{:.6e}", r.k_hat),
                x_next: format!("{:.4}", r.x_next),
                time_to_finish: format!("{:.4}", r.time_to_finish),
                iterations: r.iterations.to_string(),
                status: status(r),
            },
            Err(e) => ReportRow {
                name: self.name.clone(),
                n: "-".to_string(),
                b_hat: "-".to_string(),
                k_hat: "-".to_string(),
                x_next: "-".to_string(),
                time_to_finish: "-".to_string(),
                iterations: "-".to_string(),
                status: e.to_string(),
            },
        }
    }

    fn csv_record(&self) -> Vec<String> {
        match &self.outcome {
            Ok(r) => vec![
                self.name.clone(),
                r.n.to_string(),
                r.b_hat.to_string(),
                r.k_hat.to_string(),
                r.x_next.to_string(),
                r.time_to_finish.to_string(),
                r.iterations.to_string(),
                r.converged.to_string(),
                String::new(),
            ],
            Err(e) => {
                let mut record = vec![self.name.clone()];
                record.extend(std::iter::repeat_n(String::new(), CSV_HEADERS.len() - 2));
                record.push(e.to_string());
                record
            }
        }
    }
}

/// Pretty table of the estimates
pub fn report_table(reports: &[VariantReport]) -> String {
    let rows: Vec<ReportRow> = reports.iter().map(|r| r.row()).collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn save_reports_to_csv(reports: &[VariantReport], filename: &str) -> io::Result<()> {
    let headers: Vec<String> = CSV_HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<Vec<String>> = reports.iter().map(|r| r.csv_record()).collect();
    save_table_to_csv(&headers, &rows, filename)
}
