//! Rule Engine
//!
//! Additive model: every detector sees every flow and every finding is kept.
//! Registration order only fixes the order of findings in the output.

use super::dns_beaconing::DnsBeaconingDetector;
use super::port_scan::PortScanDetector;
use super::types::{DetectorThresholds, Finding};
use crate::logic::flow::FlowRecord;

// ============================================================================
// DETECTOR TRAIT
// ============================================================================

/// One side-effect-free detector.
///
/// Implementations must not hold shared mutable state; the engine may call
/// `evaluate` for different flows from different threads.
pub trait Detector: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, flow: &FlowRecord) -> Option<Finding>;
}

// ============================================================================
// RULE SET
// ============================================================================

pub struct RuleSet {
    detectors: Vec<Box<dyn Detector>>,
}

impl RuleSet {
    /// Rule set with no detectors. `Default` is the built-in set instead.
    pub fn empty() -> Self {
        Self { detectors: Vec::new() }
    }

    /// Built-in detectors: port scan, then DNS beaconing
    pub fn with_defaults(thresholds: &DetectorThresholds) -> Self {
        Self::empty()
            .with(PortScanDetector::new(thresholds))
            .with(DnsBeaconingDetector::new(thresholds))
    }

    /// Builder-style registration
    pub fn with<D: Detector + 'static>(mut self, detector: D) -> Self {
        self.register(Box::new(detector));
        self
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) {
        log::debug!("Registered detector {}", detector.name());
        self.detectors.push(detector);
    }

    /// Run all detectors, collect all findings
    pub fn evaluate(&self, flow: &FlowRecord) -> Vec<Finding> {
        self.detectors
            .iter()
            .filter_map(|detector| {
                let finding = detector.evaluate(flow)?;
                log::debug!(
                    "{} fired on {} -> {}:{}",
                    detector.name(), flow.src_ip(), flow.dst_ip(), flow.dst_port()
                );
                Some(finding)
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

/// The built-in detectors at default thresholds; use `RuleSet::empty()`
/// to start from nothing.
impl Default for RuleSet {
    fn default() -> Self {
        Self::with_defaults(&DetectorThresholds::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::{DNS_BEACONING_RULE, PORT_SCAN_RULE};

    /// Fires on every flow with an unknown destination
    struct UnknownDestination;

    impl Detector for UnknownDestination {
        fn name(&self) -> &str {
            "UNKNOWN_DST"
        }

        fn evaluate(&self, flow: &FlowRecord) -> Option<Finding> {
            (flow.dst_ip.is_none()).then(|| Finding {
                rule: "UNKNOWN_DST".to_string(),
                severity_boost: 0.05,
                indicator: "destination missing from flow record".to_string(),
            })
        }
    }

    fn port_scan_and_dns_flow() -> FlowRecord {
        FlowRecord {
            protocol: Some("UDP".to_string()),
            dst_port: Some(53),
            dst_port_count: Some(40),
            packets_per_second: Some(12.0),
            dns_entropy: Some(4.2),
            dns_subdomain_depth: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_rule_order() {
        let rules = RuleSet::default();
        assert_eq!(rules.names(), vec!["PORT_SCAN", "DNS_BEACONING"]);
    }

    #[test]
    fn test_collects_all_findings() {
        let findings = RuleSet::default().evaluate(&port_scan_and_dns_flow());
        let names: Vec<_> = findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(names, vec!["PORT_SCAN", "DNS_BEACONING"]);
    }

    #[test]
    fn test_custom_detector_plugs_in() {
        let rules = RuleSet::default().with(UnknownDestination);
        assert_eq!(rules.len(), 3);

        let findings = rules.evaluate(&port_scan_and_dns_flow());
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[2].rule, "UNKNOWN_DST");
    }

    #[test]
    fn test_no_findings_for_quiet_flow() {
        assert!(RuleSet::default().evaluate(&FlowRecord::default()).is_empty());
        assert!(RuleSet::empty().is_empty());
    }

    #[test]
    fn test_empty_and_default_differ() {
        assert!(RuleSet::empty().names().is_empty());
        assert_eq!(RuleSet::default().names(), vec![PORT_SCAN_RULE, DNS_BEACONING_RULE]);
    }
}
