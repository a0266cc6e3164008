//! Threat Types
//!
//! Core types for labeling and scoring.
//! No logic here beyond the fixed vocabulary mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::flow::FlowRecord;
use crate::logic::rules::Finding;

// ============================================================================
// THREAT LABEL
// ============================================================================

/// Heuristic threat label, assigned by ordered precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLabel {
    Benign,
    PortScan,
    BruteForce,
    DataExfil,
    C2Beacon,
    DnsTunnel,
    SuspiciousTraffic,
}

impl ThreatLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLabel::Benign => "BENIGN",
            ThreatLabel::PortScan => "PORT_SCAN",
            ThreatLabel::BruteForce => "BRUTE_FORCE",
            ThreatLabel::DataExfil => "DATA_EXFIL",
            ThreatLabel::C2Beacon => "C2_BEACON",
            ThreatLabel::DnsTunnel => "DNS_TUNNEL",
            ThreatLabel::SuspiciousTraffic => "SUSPICIOUS_TRAFFIC",
        }
    }

    pub fn is_benign(&self) -> bool {
        matches!(self, ThreatLabel::Benign)
    }
}

impl std::fmt::Display for ThreatLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// THREAT TYPE (coarse category)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    PortScan,
    Beaconing,
    DenialOfService,
    MalwareActivity,
    #[default]
    AnomalousFlow,
}

impl ThreatType {
    /// Keyword match on the label text
    pub fn from_label_text(label: &str) -> Self {
        let text = label.to_lowercase();
        if text.contains("scan") {
            ThreatType::PortScan
        } else if text.contains("beacon") {
            ThreatType::Beaconing
        } else if text.contains("dos") || text.contains("ddos") {
            ThreatType::DenialOfService
        } else if text.contains("malware") {
            ThreatType::MalwareActivity
        } else {
            ThreatType::AnomalousFlow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatType::PortScan => "port_scan",
            ThreatType::Beaconing => "beaconing",
            ThreatType::DenialOfService => "denial_of_service",
            ThreatType::MalwareActivity => "malware_activity",
            ThreatType::AnomalousFlow => "anomalous_flow",
        }
    }
}

impl From<ThreatLabel> for ThreatType {
    fn from(label: ThreatLabel) -> Self {
        ThreatType::from_label_text(label.as_str())
    }
}

// ============================================================================
// SEVERITY LEVELS
// ============================================================================

/// Severity band derived from the final threat score.
///
/// Declaration order is the rank order (`Unknown` < `Low` < ... < `Critical`),
/// so `max()` over severities is the severity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Score outside every band (only reachable with NaN / unclamped input)
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Half-open bands: [0,0.3) [0.3,0.6) [0.6,0.8) [0.8,1.0]
    pub fn from_score(score: f64) -> Self {
        if (0.0..0.3).contains(&score) {
            Severity::Low
        } else if (0.3..0.6).contains(&score) {
            Severity::Medium
        } else if (0.6..0.8).contains(&score) {
            Severity::High
        } else if (0.8..=1.0).contains(&score) {
            Severity::Critical
        } else {
            log::warn!("Score {} outside all severity bands, using UNKNOWN", score);
            Severity::Unknown
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Severity::Unknown => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Unknown => "UNKNOWN",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

/// Breakdown of how the final score was calculated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Min-max normalized rule suspicion score
    pub rule_score: f64,
    /// Min-max normalized anomaly score
    pub anomaly_score: f64,
    pub rule_contribution: f64,
    pub anomaly_contribution: f64,
    /// Sum of detector boosts
    pub severity_boost: f64,
    /// Clamped to [0, 1]
    pub final_score: f64,
}

// ============================================================================
// SCORED FLOW
// ============================================================================

/// One flow after rule evaluation, fusion and labeling
#[derive(Debug, Clone)]
pub struct ScoredFlow {
    /// Position in the input batch
    pub index: usize,
    pub flow: FlowRecord,
    /// Parsed `first_seen`, if the flow carried one
    pub observed_at: Option<DateTime<Utc>>,
    pub findings: Vec<Finding>,
    pub breakdown: ScoreBreakdown,
    pub label: ThreatLabel,
}
