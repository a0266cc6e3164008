//! DNS Beaconing Detection
//!
//! Repetitive, high-entropy, deeply nested queries to UDP/53.
//! Pre-computed flags from feature engineering can stand in for the raw values.

use super::engine::Detector;
use super::types::{DetectorThresholds, Finding, DNS_BEACONING_RULE};
use crate::logic::flow::FlowRecord;

const DNS_PORT: i32 = 53;

pub struct DnsBeaconingDetector {
    min_pps: f64,
    min_entropy: f64,
    min_depth: u32,
    boost: f64,
}

impl DnsBeaconingDetector {
    pub fn new(thresholds: &DetectorThresholds) -> Self {
        Self {
            min_pps: thresholds.dns_min_packets_per_second,
            min_entropy: thresholds.dns_min_entropy,
            min_depth: thresholds.dns_min_subdomain_depth,
            boost: thresholds.dns_boost,
        }
    }

    fn is_dns(flow: &FlowRecord) -> bool {
        flow.is_protocol("UDP") && flow.dst_port() == DNS_PORT
    }
}

impl Default for DnsBeaconingDetector {
    fn default() -> Self {
        Self::new(&DetectorThresholds::default())
    }
}

impl Detector for DnsBeaconingDetector {
    fn name(&self) -> &str {
        DNS_BEACONING_RULE
    }

    fn evaluate(&self, flow: &FlowRecord) -> Option<Finding> {
        if !Self::is_dns(flow) {
            return None;
        }

        let fast = flow.packets_per_second() > self.min_pps;
        let random = flow.dns_entropy() > self.min_entropy || flow.has_high_dns_entropy_flag();
        let deep = flow.dns_subdomain_depth() >= self.min_depth || flow.has_deep_dns_flag();

        if !(fast && random && deep) {
            return None;
        }

        Some(Finding {
            rule: DNS_BEACONING_RULE.to_string(),
            severity_boost: self.boost,
            indicator: "suspicious high-entropy, repetitive DNS queries".to_string(),
        })
    }
}
