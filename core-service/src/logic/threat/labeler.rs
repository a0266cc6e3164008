//! Threat Labeler
//!
//! Ordered cascade, first match wins, default BENIGN.

use super::rules::LabelThresholds;
use super::types::ThreatLabel;
use crate::logic::flow::FlowRecord;

/// Assign a label from flow features and the fused final score
pub fn assign_label(flow: &FlowRecord, final_score: f64, t: &LabelThresholds) -> ThreatLabel {
    if flow.dst_port_count() >= t.port_scan_min_ports {
        return ThreatLabel::PortScan;
    }

    if flow.connection_count() >= t.brute_force_min_connections
        && flow.avg_duration() < t.brute_force_max_avg_duration
    {
        return ThreatLabel::BruteForce;
    }

    if flow.bytes_sent() >= t.data_exfil_min_bytes {
        return ThreatLabel::DataExfil;
    }

    if flow.periodicity_score() >= t.c2_beacon_min_periodicity {
        return ThreatLabel::C2Beacon;
    }

    if flow.dns_query_length() >= t.dns_tunnel_min_query_length {
        return ThreatLabel::DnsTunnel;
    }

    if final_score >= t.suspicious_min_score {
        return ThreatLabel::SuspiciousTraffic;
    }

    ThreatLabel::Benign
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(flow: &FlowRecord, score: f64) -> ThreatLabel {
        assign_label(flow, score, &LabelThresholds::default())
    }

    #[test]
    fn test_benign_by_default() {
        assert_eq!(label(&FlowRecord::default(), 0.1), ThreatLabel::Benign);
    }

    #[test]
    fn test_port_scan_wins_over_everything() {
        let flow = FlowRecord {
            dst_port_count: Some(20),
            connection_count: Some(100),
            avg_duration: Some(0.1),
            bytes_sent: Some(10_000_000),
            periodicity_score: Some(0.95),
            dns_query_length: Some(80.0),
            ..Default::default()
        };
        assert_eq!(label(&flow, 0.99), ThreatLabel::PortScan);
    }

    #[test]
    fn test_brute_force_needs_short_connections() {
        let mut flow = FlowRecord {
            connection_count: Some(30),
            avg_duration: Some(0.5),
            ..Default::default()
        };
        assert_eq!(label(&flow, 0.0), ThreatLabel::BruteForce);

        flow.avg_duration = Some(1.0);
        assert_eq!(label(&flow, 0.0), ThreatLabel::Benign);

        // Missing avg_duration never counts as short
        flow.avg_duration = None;
        assert_eq!(label(&flow, 0.0), ThreatLabel::Benign);
    }

    #[test]
    fn test_cascade_order() {
        let exfil = FlowRecord {
            bytes_sent: Some(5_000_000),
            periodicity_score: Some(0.9),
            ..Default::default()
        };
        assert_eq!(label(&exfil, 0.0), ThreatLabel::DataExfil);

        let beacon = FlowRecord {
            periodicity_score: Some(0.8),
            dns_query_length: Some(60.0),
            ..Default::default()
        };
        assert_eq!(label(&beacon, 0.0), ThreatLabel::C2Beacon);

        let tunnel = FlowRecord { dns_query_length: Some(50.0), ..Default::default() };
        assert_eq!(label(&tunnel, 0.9), ThreatLabel::DnsTunnel);
    }

    #[test]
    fn test_suspicious_by_score_only() {
        assert_eq!(label(&FlowRecord::default(), 0.6), ThreatLabel::SuspiciousTraffic);
        assert_eq!(label(&FlowRecord::default(), 0.59), ThreatLabel::Benign);
    }
}
