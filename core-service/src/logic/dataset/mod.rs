//! Dataset Module - batch input and report output
//!
//! Reads flow / anomaly / alert batches (JSON array or JSONL) and writes the
//! four report files as one atomic set.

pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use reader::{load_alerts, load_anomaly_scores, load_flows, load_records};
pub use writer::ReportWriter;
