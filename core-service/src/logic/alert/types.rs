//! Alert Types
//!
//! Field names are a contract with explanation generators and dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{UNKNOWN_FIELD, UNKNOWN_PORT};
use crate::logic::threat::{ScoreBreakdown, Severity, ThreatLabel, ThreatType};

fn unknown_field() -> String {
    UNKNOWN_FIELD.to_string()
}

fn unknown_port() -> i32 {
    UNKNOWN_PORT
}

// ============================================================================
// ALERT
// ============================================================================

/// One flagged (non-benign) flow. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub alert_id: String,
    #[serde(with = "crate::logic::timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(default = "unknown_field")]
    pub src_ip: String,
    #[serde(default = "unknown_field")]
    pub dst_ip: String,
    #[serde(default = "unknown_port")]
    pub src_port: i32,
    #[serde(default = "unknown_port")]
    pub dst_port: i32,
    #[serde(default = "unknown_field")]
    pub protocol: String,

    pub threat_label: ThreatLabel,
    #[serde(default)]
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub final_threat_score: f64,
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub triggered_rules: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

// ============================================================================
// TIMESTAMP SOURCE
// ============================================================================

/// Where an alert's timestamp comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Wall clock at alert creation
    #[default]
    Ingest,
    /// The flow's `first_seen`, wall clock if the flow has none
    Flow,
}

impl std::str::FromStr for TimestampSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingest" => Ok(TimestampSource::Ingest),
            "flow" => Ok(TimestampSource::Flow),
            other => Err(format!("unknown timestamp source '{}'", other)),
        }
    }
}

// ============================================================================
// INDICATOR THRESHOLDS
// ============================================================================

/// Feature thresholds that produce analyst indicators (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorThresholds {
    /// packet_count strictly above this
    pub high_packet_count: u64,
    /// duration strictly below this (seconds)
    pub short_duration_secs: f64,
    /// mean inter-arrival time strictly below this (seconds)
    pub fast_inter_arrival_secs: f64,
}

impl Default for IndicatorThresholds {
    fn default() -> Self {
        Self {
            high_packet_count: 1000,
            short_duration_secs: 1.0,
            fast_inter_arrival_secs: 0.01,
        }
    }
}
