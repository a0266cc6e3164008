//! Flow Sentinel - Detection & Correlation Core
//!
//! Turns network flow records plus externally supplied anomaly scores into
//! explainable alerts, then correlates them into incidents, campaigns and
//! narrated timelines.
//!
//! ```ignore
//! use flow_sentinel::logic::config::EngineConfig;
//! use flow_sentinel::logic::pipeline::DetectionPipeline;
//!
//! let pipeline = DetectionPipeline::new(EngineConfig::default());
//! let report = pipeline.run(flows, &anomaly_scores)?;
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{EngineError, EngineResult};
