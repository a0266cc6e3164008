//! Flow Types
//!
//! Wire shape of one flow record as produced by the flow collector.
//! Every field is optional; accessors apply the documented defaults.
//! Flags and counts accept the loose encodings upstream writers emit.

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::constants::{UNKNOWN_FIELD, UNKNOWN_PORT};

/// Default for `avg_duration` when absent. Large enough that the
/// brute-force rule (avg_duration < 1s) never fires on missing data.
pub const DEFAULT_AVG_DURATION: f64 = 10.0;

// ============================================================================
// FLOW RECORD
// ============================================================================

/// One network flow observation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowRecord {
    /// Explicit join key for anomaly scores (optional)
    pub flow_id: Option<String>,

    // 5-tuple
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub src_port: Option<i32>,
    #[serde(deserialize_with = "lenient::count")]
    pub dst_port: Option<i32>,
    pub protocol: Option<String>,

    // Timing
    #[serde(alias = "timestamp")]
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,

    // Volume
    #[serde(deserialize_with = "lenient::count")]
    pub packet_count: Option<u64>,
    #[serde(alias = "flow_duration")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_bytes: Option<u64>,
    pub avg_packet_size: Option<f64>,

    // Inter-arrival times
    pub min_iat: Option<f64>,
    pub max_iat: Option<f64>,
    #[serde(alias = "avg_inter_arrival_time")]
    pub mean_iat: Option<f64>,
    pub std_iat: Option<f64>,

    // Rates
    pub bytes_per_second: Option<f64>,
    pub packets_per_second: Option<f64>,
    pub avg_bytes_per_packet: Option<f64>,

    // DNS
    pub dns_query_length: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub dns_subdomain_depth: Option<u32>,
    pub dns_entropy: Option<f64>,
    #[serde(deserialize_with = "lenient::flag")]
    pub flag_high_dns_entropy: Option<u8>,
    #[serde(deserialize_with = "lenient::flag")]
    pub flag_deep_dns: Option<u8>,

    // Source-level aggregates (enriched upstream)
    #[serde(deserialize_with = "lenient::count")]
    pub dst_port_count: Option<u32>,
    #[serde(deserialize_with = "lenient::count")]
    pub connection_count: Option<u32>,
    pub avg_duration: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub bytes_sent: Option<u64>,
    pub periodicity_score: Option<f64>,

    /// Pre-computed rule-based suspicion score
    pub suspicion_score: Option<f64>,
}

impl FlowRecord {
    pub fn src_ip(&self) -> &str {
        self.src_ip.as_deref().unwrap_or(UNKNOWN_FIELD)
    }

    pub fn dst_ip(&self) -> &str {
        self.dst_ip.as_deref().unwrap_or(UNKNOWN_FIELD)
    }

    pub fn src_port(&self) -> i32 {
        self.src_port.unwrap_or(UNKNOWN_PORT)
    }

    pub fn dst_port(&self) -> i32 {
        self.dst_port.unwrap_or(UNKNOWN_PORT)
    }

    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(UNKNOWN_FIELD)
    }

    /// Case-insensitive protocol check ("udp" == "UDP")
    pub fn is_protocol(&self, name: &str) -> bool {
        self.protocol().eq_ignore_ascii_case(name)
    }

    pub fn suspicion_score(&self) -> f64 {
        self.suspicion_score.unwrap_or(0.0)
    }

    pub fn packets_per_second(&self) -> f64 {
        self.packets_per_second.unwrap_or(0.0)
    }

    pub fn dns_entropy(&self) -> f64 {
        self.dns_entropy.unwrap_or(0.0)
    }

    pub fn dns_subdomain_depth(&self) -> u32 {
        self.dns_subdomain_depth.unwrap_or(0)
    }

    pub fn has_high_dns_entropy_flag(&self) -> bool {
        self.flag_high_dns_entropy == Some(1)
    }

    pub fn has_deep_dns_flag(&self) -> bool {
        self.flag_deep_dns == Some(1)
    }

    pub fn dst_port_count(&self) -> u32 {
        self.dst_port_count.unwrap_or(0)
    }

    pub fn connection_count(&self) -> u32 {
        self.connection_count.unwrap_or(0)
    }

    pub fn avg_duration(&self) -> f64 {
        self.avg_duration.unwrap_or(DEFAULT_AVG_DURATION)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.unwrap_or(0)
    }

    pub fn periodicity_score(&self) -> f64 {
        self.periodicity_score.unwrap_or(0.0)
    }

    pub fn dns_query_length(&self) -> f64 {
        self.dns_query_length.unwrap_or(0.0)
    }

    /// Names of 5-tuple fields that fell back to defaults
    pub fn defaulted_tuple_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.src_ip.is_none() { missing.push("src_ip"); }
        if self.dst_ip.is_none() { missing.push("dst_ip"); }
        if self.src_port.is_none() { missing.push("src_port"); }
        if self.dst_port.is_none() { missing.push("dst_port"); }
        if self.protocol.is_none() { missing.push("protocol"); }
        missing
    }
}

// ============================================================================
// ANOMALY SCORE INPUT
// ============================================================================

/// One externally supplied anomaly score: bare or keyed by flow id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnomalyEntry {
    Plain(f64),
    Keyed { flow_id: String, score: f64 },
}

impl AnomalyEntry {
    pub fn score(&self) -> f64 {
        match self {
            AnomalyEntry::Plain(score) => *score,
            AnomalyEntry::Keyed { score, .. } => *score,
        }
    }

    pub fn flow_id(&self) -> Option<&str> {
        match self {
            AnomalyEntry::Plain(_) => None,
            AnomalyEntry::Keyed { flow_id, .. } => Some(flow_id),
        }
    }
}

/// A flow joined with its raw (un-normalized) anomaly score
#[derive(Debug, Clone)]
pub struct FlowInput {
    pub flow: FlowRecord,
    pub anomaly_score: f64,
}
