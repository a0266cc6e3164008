//! Threat Labeling Rules & Fusion Weights
//!
//! Thresholds for the label cascade and weights for score fusion.
//! No classify logic here - only constants and config.

use serde::{Deserialize, Serialize};

// ============================================================================
// WEIGHTS (How much each component contributes to the final score)
// ============================================================================

/// Weight of the normalized rule suspicion score (60%)
pub const RULE_WEIGHT: f64 = 0.6;

/// Weight of the normalized anomaly score (40%)
pub const ANOMALY_WEIGHT: f64 = 0.4;

/// Confidence bonus per triggered detector
pub const CONFIDENCE_PER_DETECTOR: f64 = 0.1;

// ============================================================================
// LABEL THRESHOLDS
// ============================================================================

pub const PORT_SCAN_MIN_PORTS: u32 = 20;
pub const BRUTE_FORCE_MIN_CONNECTIONS: u32 = 30;
pub const BRUTE_FORCE_MAX_AVG_DURATION: f64 = 1.0;
pub const DATA_EXFIL_MIN_BYTES: u64 = 5_000_000;
pub const C2_BEACON_MIN_PERIODICITY: f64 = 0.8;
pub const DNS_TUNNEL_MIN_QUERY_LENGTH: f64 = 50.0;
pub const SUSPICIOUS_MIN_SCORE: f64 = 0.6;

/// Thresholds for the label cascade (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelThresholds {
    pub port_scan_min_ports: u32,
    pub brute_force_min_connections: u32,
    /// Strict upper bound on avg_duration (seconds)
    pub brute_force_max_avg_duration: f64,
    pub data_exfil_min_bytes: u64,
    pub c2_beacon_min_periodicity: f64,
    pub dns_tunnel_min_query_length: f64,
    pub suspicious_min_score: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            port_scan_min_ports: PORT_SCAN_MIN_PORTS,
            brute_force_min_connections: BRUTE_FORCE_MIN_CONNECTIONS,
            brute_force_max_avg_duration: BRUTE_FORCE_MAX_AVG_DURATION,
            data_exfil_min_bytes: DATA_EXFIL_MIN_BYTES,
            c2_beacon_min_periodicity: C2_BEACON_MIN_PERIODICITY,
            dns_tunnel_min_query_length: DNS_TUNNEL_MIN_QUERY_LENGTH,
            suspicious_min_score: SUSPICIOUS_MIN_SCORE,
        }
    }
}

impl LabelThresholds {
    /// High sensitivity - lower thresholds, more alerts
    pub fn high_sensitivity() -> Self {
        Self {
            port_scan_min_ports: 10,
            brute_force_min_connections: 15,
            suspicious_min_score: 0.5,
            ..Default::default()
        }
    }

    /// Low sensitivity - higher thresholds, fewer alerts
    pub fn low_sensitivity() -> Self {
        Self {
            port_scan_min_ports: 50,
            brute_force_min_connections: 60,
            suspicious_min_score: 0.75,
            ..Default::default()
        }
    }
}

// ============================================================================
// FUSION CONFIG
// ============================================================================

/// Fixed min/max bounds for min-max normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationBounds {
    pub min: f64,
    pub max: f64,
}

/// Score fusion settings (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub rule_weight: f64,
    pub anomaly_weight: f64,
    /// Fixed bounds instead of batch min/max (enables streaming scoring)
    pub rule_bounds: Option<NormalizationBounds>,
    pub anomaly_bounds: Option<NormalizationBounds>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rule_weight: RULE_WEIGHT,
            anomaly_weight: ANOMALY_WEIGHT,
            rule_bounds: None,
            anomaly_bounds: None,
        }
    }
}
