//! Alert Module
//!
//! One explainable Alert per non-benign flow.
//!
//! ## Structure
//! - `types`: `Alert`, `IndicatorThresholds`, `TimestampSource`
//! - `builder`: `AlertBuilder` (ids, indicators, reason/summary text)

pub mod types;
pub mod builder;

pub use types::{Alert, IndicatorThresholds, TimestampSource};
pub use builder::{feature_indicators, AlertBuilder};
