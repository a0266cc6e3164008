//! Detection Rules Module
//!
//! Pluggable per-flow detectors. New detectors implement `Detector` and are
//! registered on a `RuleSet`; scoring and alert building never change.
//!
//! # Components
//! - `engine.rs`: `Detector` trait + `RuleSet`
//! - `port_scan.rs`: destination port diversity
//! - `dns_beaconing.rs`: high-entropy DNS beaconing
//! - `types.rs`: `Finding`, `DetectorThresholds`

pub mod engine;
pub mod port_scan;
pub mod dns_beaconing;
pub mod types;

pub use engine::{Detector, RuleSet};
pub use port_scan::PortScanDetector;
pub use dns_beaconing::DnsBeaconingDetector;
pub use types::{DetectorThresholds, Finding, DNS_BEACONING_RULE, PORT_SCAN_RULE};
