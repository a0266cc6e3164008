//! Logic Module - Detection & Correlation Engines
//!
//! ## Stages
//! - `flow/` - Flow records, anomaly score join
//! - `rules/` - Pluggable per-flow detectors
//! - `threat/` - Score fusion, severity bands, label cascade
//! - `alert/` - Explainable alerts
//! - `incident/` - Aggregation, campaigns, timelines
//! - `pipeline` - Runs the stages in order
//! - `dataset/` - Batch input and report output

// Engine stages
pub mod flow;
pub mod rules;
pub mod threat;
pub mod alert;
pub mod incident;
pub mod pipeline;

// Support
pub mod config;
pub mod dataset;
pub mod timestamp;
