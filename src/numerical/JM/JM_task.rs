//! Task documents: solver settings and the interval sequences to evaluate.
//!
//! ```text
//! solver
//!   tolerance: 1e-10
//!   max_iterations: 200
//!   loglevel: info
//!   log_to_file: false
//!   csv_output: jm_results.csv
//! variant_1
//!   intervals: 9, 12, 11, 4, 7
//! ```
//! Every section other than `solver` is a variant and must have an `intervals` key.
use crate::Utils::task_parser::{SectionMap, Value, parse_document_as};
use crate::numerical::JM::JM_api::SolverConfig;
use itertools::Itertools;
use log::info;
use std::error::Error;
use std::fmt;
use std::fs;

const SOLVER_SECTION: &str = "solver";

/// Interval tables of the five course variants
pub const COURSE_VARIANTS: &str = "\
solver
  tolerance: 1e-10
  max_iterations: 200
  loglevel: info
variant_1
  intervals: 9, 12, 11, 4, 7, 2, 5, 8, 5, 7, 1, 6, 1, 9, 4, 1, 3, 3, 6, 1, 1, 11, 33, 7, 91, 2
variant_2
  intervals: 7, 10, 12, 6, 7, 3, 5, 9, 5, 7, 2, 6, 1, 8, 3, 1, 2, 3, 5, 1, 84, 30, 7, 3, 1
variant_3
  intervals: 5, 4, 11, 13, 6, 2, 7, 5, 8, 7, 1, 4, 2, 7, 6, 2, 3, 1, 4, 78, 25, 10, 7, 16, 3, 1, 2
variant_4
  intervals: 5, 8, 12, 7, 6, 4, 3, 7, 8, 5, 2, 9, 3, 6, 5, 2, 4, 3, 77, 2, 9, 8, 10, 1, 5, 3, 4, 2
variant_5
  intervals: 4, 13, 10, 5, 8, 1, 6, 7, 4, 9, 5, 2, 3, 8, 6, 3, 2, 3, 94, 5, 12, 8, 28, 3
";

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    Io(String),
    Parse(String),
    MissingField { section: String, key: String },
    InvalidValue { section: String, key: String, reason: String },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::Io(msg) => write!(f, "Cannot read task file: {}", msg),
            TaskError::Parse(msg) => write!(f, "Cannot parse task: {}", msg),
            TaskError::MissingField { section, key } => {
                write!(f, "Section '{}' has no '{}' key", section, key)
            }
            TaskError::InvalidValue {
                section,
                key,
                reason,
            } => write!(f, "Invalid value of '{}' in section '{}': {}", key, section, reason),
        }
    }
}

impl Error for TaskError {}

/// Named sequence of inter-defect intervals
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub name: String,
    pub intervals: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimationTask {
    pub solver: SolverConfig,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
    pub csv_output: Option<String>,
    pub variants: Vec<Variant>,
}

fn invalid(section: &str, key: &str, reason: &str) -> TaskError {
    TaskError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// the only value of a key, None if the key is absent
fn single_value<'a>(
    section_map: &'a SectionMap,
    section: &str,
    key: &str,
) -> Result<Option<&'a Value>, TaskError> {
    match section_map.get(key) {
        None => Ok(None),
        Some(values) if values.len() == 1 => Ok(values.first()),
        Some(_) => Err(invalid(section, key, "expected a single value")),
    }
}

impl EstimationTask {
    /// Build a task from a document in the task format
    pub fn from_document(document: &str) -> Result<Self, TaskError> {
        let sections = parse_document_as(document).map_err(TaskError::Parse)?;
        let mut task = EstimationTask {
            solver: SolverConfig::default(),
            loglevel: None,
            log_to_file: false,
            csv_output: None,
            variants: Vec::new(),
        };
        for (title, section_map) in &sections {
            if title == SOLVER_SECTION {
                task.read_solver_section(section_map)?;
            } else {
                task.variants.push(Self::read_variant(title, section_map)?);
            }
        }
        if task.variants.is_empty() {
            return Err(TaskError::Parse("task contains no variants".to_string()));
        }
        task.solver
            .validate()
            .map_err(|e| invalid(SOLVER_SECTION, "tolerance/max_iterations", &e.to_string()))?;
        info!(
            "task with variants {} loaded",
            task.variants.iter().map(|v| v.name.as_str()).join(", ")
        );
        Ok(task)
    }

    pub fn from_file(path: &str) -> Result<Self, TaskError> {
        let document = fs::read_to_string(path).map_err(|e| TaskError::Io(format!("{}: {}", path, e)))?;
        Self::from_document(&document)
    }

    /// The five course variants with default solver settings
    pub fn course_variants() -> Result<Self, TaskError> {
        Self::from_document(COURSE_VARIANTS)
    }

    fn read_solver_section(&mut self, section_map: &SectionMap) -> Result<(), TaskError> {
        let s = SOLVER_SECTION;
        if let Some(value) = single_value(section_map, s, "tolerance")? {
            let tolerance = value
                .as_number()
                .ok_or_else(|| invalid(s, "tolerance", "expected a number"))?;
            self.solver.set_tolerance(tolerance);
        }
        if let Some(value) = single_value(section_map, s, "max_iterations")? {
            let max_iterations = value
                .as_integer()
                .filter(|i| *i > 0)
                .ok_or_else(|| invalid(s, "max_iterations", "expected a positive integer"))?;
            self.solver.set_max_iterations(max_iterations as usize);
        }
        if let Some(value) = single_value(section_map, s, "loglevel")? {
            let level = value
                .as_string()
                .ok_or_else(|| invalid(s, "loglevel", "expected a level name"))?;
            self.loglevel = Some(level.clone());
        }
        if let Some(value) = single_value(section_map, s, "log_to_file")? {
            self.log_to_file = value
                .as_boolean()
                .ok_or_else(|| invalid(s, "log_to_file", "expected true or false"))?;
        }
        if let Some(value) = single_value(section_map, s, "csv_output")? {
            self.csv_output = Some(value.to_string());
        }
        Ok(())
    }

    fn read_variant(title: &str, section_map: &SectionMap) -> Result<Variant, TaskError> {
        let values = section_map
            .get("intervals")
            .ok_or_else(|| TaskError::MissingField {
                section: title.to_string(),
                key: "intervals".to_string(),
            })?;
        let intervals = values
            .iter()
            .map(|v| {
                v.as_number()
                    .ok_or_else(|| invalid(title, "intervals", &format!("'{}' is not a number", v)))
            })
            .collect::<Result<Vec<f64>, TaskError>>()?;
        Ok(Variant {
            name: title.to_string(),
            intervals,
        })
    }
}
