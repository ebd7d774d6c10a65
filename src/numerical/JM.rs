//! Jelinski-Moranda software reliability model.
//!
//! The model assumes the defect detection rate is proportional to the number of defects
//! still present in the program. From the intervals X_1..X_n between detected defects the
//! total number of defects B is estimated by maximum likelihood (Newton's method), then the
//! per-defect rate K, the expected time to the next defect and the expected time to finish
//! testing are derived.
/// public api: configuration, result and error types, `estimate` functions
pub mod JM_api;
/// parallel evaluation of several variants, table and csv reports
pub mod JM_batch;
/// K, time to next defect and time to finish testing from the estimate of B
pub mod JM_metrics;
/// guarded Newton iteration for the likelihood equation of B
pub mod JM_newton;
/// task documents with solver settings and variants
pub mod JM_task;
