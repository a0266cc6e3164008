//! Threat Module
//!
//! Turns a flow into a final threat score, a severity band and a label.
//!
//! ## Structure
//! - `types`: Core types (ThreatLabel, ThreatType, Severity, ScoreBreakdown, ScoredFlow)
//! - `rules`: Thresholds, weights and their config structs
//! - `fusion`: Min-max normalization + weighted fusion + confidence
//! - `labeler`: Ordered label cascade
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{assign_label, ScoreFusion, Severity};
//!
//! let fusion = ScoreFusion::fit(&inputs, &config.fusion);
//! let breakdown = fusion.fuse(raw_rule, raw_anomaly, &findings);
//! let label = assign_label(&flow, breakdown.final_score, &config.labels);
//! let severity = Severity::from_score(breakdown.final_score);
//! ```

pub mod types;
pub mod rules;
pub mod fusion;
pub mod labeler;

pub use types::{ScoreBreakdown, ScoredFlow, Severity, ThreatLabel, ThreatType};

pub use rules::{FusionConfig, LabelThresholds, NormalizationBounds, ANOMALY_WEIGHT, RULE_WEIGHT};

pub use fusion::{confidence, round_to, ScoreFusion};

pub use labeler::assign_label;
