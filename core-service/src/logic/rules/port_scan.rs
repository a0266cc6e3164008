//! Port Scan Detection
//!
//! High destination-port diversity from one source.

use super::engine::Detector;
use super::types::{DetectorThresholds, Finding, PORT_SCAN_RULE};
use crate::logic::flow::FlowRecord;

pub struct PortScanDetector {
    min_ports: u32,
    boost: f64,
}

impl PortScanDetector {
    pub fn new(thresholds: &DetectorThresholds) -> Self {
        Self {
            min_ports: thresholds.port_scan_min_ports,
            boost: thresholds.port_scan_boost,
        }
    }
}

impl Default for PortScanDetector {
    fn default() -> Self {
        Self::new(&DetectorThresholds::default())
    }
}

impl Detector for PortScanDetector {
    fn name(&self) -> &str {
        PORT_SCAN_RULE
    }

    fn evaluate(&self, flow: &FlowRecord) -> Option<Finding> {
        if flow.dst_port_count() < self.min_ports {
            return None;
        }

        Some(Finding {
            rule: PORT_SCAN_RULE.to_string(),
            severity_boost: self.boost,
            indicator: "high destination port diversity".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(ports: Option<u32>) -> FlowRecord {
        FlowRecord { dst_port_count: ports, ..Default::default() }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let detector = PortScanDetector::default();
        assert!(detector.evaluate(&flow(Some(19))).is_none());

        let finding = detector.evaluate(&flow(Some(20))).unwrap();
        assert_eq!(finding.rule, "PORT_SCAN");
        assert_eq!(finding.severity_boost, 0.25);
    }

    #[test]
    fn test_missing_feature_never_fires() {
        assert!(PortScanDetector::default().evaluate(&flow(None)).is_none());
    }
}
