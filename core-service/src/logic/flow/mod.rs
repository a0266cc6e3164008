//! Flow Module
//!
//! Input side of the engine: flow records from the collector and the
//! anomaly scores produced by the statistical model.
//!
//! ## Structure
//! - `types`: `FlowRecord` (with defaulting accessors), `AnomalyEntry`, `FlowInput`
//! - `join`: batch join + input validation
//! - `lenient`: serde helpers for flag and count encodings

pub mod types;
pub mod lenient;
pub mod join;

pub use types::{AnomalyEntry, FlowInput, FlowRecord};
pub use join::join_anomaly_scores;
