//! Detection Rule Types

use serde::{Deserialize, Serialize};

// ============================================================================
// FINDING
// ============================================================================

/// Output of one detector for one flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Trigger name, e.g. "PORT_SCAN"
    pub rule: String,
    /// Non-negative, added to the fused score before clamping
    pub severity_boost: f64,
    /// Analyst-facing indicator text
    pub indicator: String,
}

// ============================================================================
// DETECTOR THRESHOLDS
// ============================================================================

pub const PORT_SCAN_RULE: &str = "PORT_SCAN";
pub const DNS_BEACONING_RULE: &str = "DNS_BEACONING";

/// Thresholds for the built-in detectors (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorThresholds {
    pub port_scan_min_ports: u32,
    pub port_scan_boost: f64,
    /// Strict lower bound on packets per second
    pub dns_min_packets_per_second: f64,
    /// Strict lower bound on DNS entropy
    pub dns_min_entropy: f64,
    pub dns_min_subdomain_depth: u32,
    pub dns_boost: f64,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            port_scan_min_ports: 20,
            port_scan_boost: 0.25,
            dns_min_packets_per_second: 5.0,
            dns_min_entropy: 3.5,
            dns_min_subdomain_depth: 3,
            dns_boost: 0.2,
        }
    }
}
