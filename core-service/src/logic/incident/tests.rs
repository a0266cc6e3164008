use super::*;
use crate::logic::alert::Alert;
use crate::logic::threat::{Severity, ThreatLabel, ThreatType};
use crate::logic::timestamp::parse_timestamp;

fn alert(id: u32, src: &str, at: &str, score: f64, rules: &[&str]) -> Alert {
    Alert {
        alert_id: format!("ALERT-{:04}", id),
        timestamp: parse_timestamp(at).unwrap(),
        src_ip: src.to_string(),
        dst_ip: "10.0.0.9".to_string(),
        src_port: 40000,
        dst_port: 22,
        protocol: "TCP".to_string(),
        threat_label: ThreatLabel::PortScan,
        threat_type: ThreatType::PortScan,
        severity: Severity::from_score(score),
        final_threat_score: score,
        confidence: 0.9,
        triggered_rules: rules.iter().map(|r| r.to_string()).collect(),
        indicators: vec![],
        reason: String::new(),
        summary: String::new(),
        score_breakdown: None,
    }
}

fn correlate(alerts: &[Alert]) -> (Vec<AggregatedIncident>, Vec<Campaign>, Vec<Timeline>) {
    let incidents = aggregate(alerts);
    let campaigns = classify(&incidents, &CampaignThresholds::default());
    let timelines = TimelineBuilder::new(alerts).build_all(&campaigns);
    (incidents, campaigns, timelines)
}

#[test]
fn test_escalation_scenario() {
    let alerts = vec![
        alert(1, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"]),
        alert(2, "10.0.0.5", "2024-03-01T10:05:00Z", 0.85, &["PORT_SCAN"]),
    ];
    let (incidents, campaigns, timelines) = correlate(&alerts);

    assert_eq!(incidents.len(), 1);
    let incident = &incidents[0];
    assert_eq!(incident.entity, "10.0.0.5");
    assert_eq!(incident.trigger, "PORT_SCAN");
    assert_eq!(incident.alert_count, 2);
    assert_eq!(incident.max_severity, Severity::Critical);
    assert_eq!(incident.avg_score, 0.775);
    assert!(incident.first_seen < incident.last_seen);

    assert_eq!(campaigns[0].campaign_type, CampaignType::RepeatedActivity);

    let events = &timelines[0].events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], "10:00:00 — PORT_SCAN detected (score: 0.7)");
    assert_eq!(events[1], "10:05:00 — Severity escalated to CRITICAL");
}

#[test]
fn test_first_event_is_routine_and_same_severity_stays_routine() {
    let alerts = vec![
        alert(1, "10.0.0.7", "2024-03-01T09:00:00Z", 0.9, &["PORT_SCAN"]),
        alert(2, "10.0.0.7", "2024-03-01T09:01:00Z", 1.0, &["PORT_SCAN"]),
        alert(3, "10.0.0.7", "2024-03-01T09:02:00Z", 0.65, &["PORT_SCAN"]),
    ];
    let (_, _, timelines) = correlate(&alerts);
    let events = &timelines[0].events;

    assert_eq!(events[0], "09:00:00 — PORT_SCAN detected (score: 0.9)");
    assert_eq!(events[1], "09:01:00 — PORT_SCAN detected (score: 1.0)");
    // Any change is narrated, including a drop
    assert_eq!(events[2], "09:02:00 — Severity escalated to HIGH");
}

#[test]
fn test_chronological_not_lexical_bounds() {
    // Offsets make the lexically larger string the earlier instant
    let alerts = vec![
        alert(1, "10.0.0.5", "2024-03-01T11:00:00+02:00", 0.7, &["PORT_SCAN"]),
        alert(2, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"]),
    ];
    let incidents = aggregate(&alerts);
    assert_eq!(incidents[0].first_seen, parse_timestamp("2024-03-01T09:00:00Z").unwrap());
    assert_eq!(incidents[0].last_seen, parse_timestamp("2024-03-01T10:00:00Z").unwrap());
}

#[test]
fn test_no_rule_alerts_are_kept() {
    let alerts = vec![
        alert(1, "10.0.0.8", "2024-03-01T10:00:00Z", 0.62, &[]),
        alert(2, "10.0.0.8", "2024-03-01T10:01:00Z", 0.7, &["PORT_SCAN"]),
    ];
    let (incidents, _, timelines) = correlate(&alerts);

    assert_eq!(incidents.len(), 2);
    let no_rule = incidents.iter().find(|i| i.trigger == "NO_RULE").unwrap();
    assert_eq!(no_rule.alert_count, 1);
    assert!(no_rule.key().is_no_rule());

    let tl = timelines.iter().find(|t| t.trigger == "NO_RULE").unwrap();
    assert_eq!(tl.events, vec!["10:00:00 — NO_RULE detected (score: 0.62)"]);
}

#[test]
fn test_multi_rule_alert_counts_under_each_rule() {
    let alerts = vec![alert(
        1,
        "10.0.0.5",
        "2024-03-01T10:00:00Z",
        0.95,
        &["PORT_SCAN", "DNS_BEACONING", "PORT_SCAN"],
    )];
    let incidents = aggregate(&alerts);

    assert_eq!(incidents.len(), 2);
    assert!(incidents.iter().all(|i| i.alert_count == 1));
    // Sorted by (entity, trigger)
    assert_eq!(incidents[0].trigger, "DNS_BEACONING");
    assert_eq!(incidents[1].trigger, "PORT_SCAN");
}

#[test]
fn test_counts_match_across_stages() {
    let mut alerts = Vec::new();
    for i in 0..7 {
        let src = if i % 2 == 0 { "10.0.0.1" } else { "10.0.0.2" };
        let at = format!("2024-03-01T10:0{}:00Z", i);
        alerts.push(alert(i + 1, src, &at, 0.5 + 0.05 * i as f64, &["PORT_SCAN"]));
    }
    let (incidents, campaigns, timelines) = correlate(&alerts);

    for ((incident, campaign), timeline) in incidents.iter().zip(&campaigns).zip(&timelines) {
        let expected = alerts
            .iter()
            .filter(|a| a.src_ip == incident.entity)
            .count();
        assert_eq!(incident.alert_count, expected);
        assert_eq!(timeline.events.len(), incident.alert_count);
        assert_eq!(campaign.incident, *incident);
        assert_eq!(timeline.campaign_type, campaign.campaign_type);
    }
}

#[test]
fn test_correlation_is_order_independent() {
    let alerts = vec![
        alert(1, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"]),
        alert(2, "10.0.0.6", "2024-03-01T10:02:00Z", 0.4, &[]),
        alert(3, "10.0.0.5", "2024-03-01T10:05:00Z", 0.85, &["PORT_SCAN"]),
        alert(4, "10.0.0.5", "2024-03-01T10:03:00Z", 0.9, &["DNS_BEACONING"]),
    ];
    let mut reversed = alerts.clone();
    reversed.reverse();

    let forward = correlate(&alerts);
    let backward = correlate(&reversed);

    assert_eq!(forward.0, backward.0);
    assert_eq!(forward.1, backward.1);
    assert_eq!(forward.2, backward.2);
}

#[test]
fn test_equal_timestamps_order_by_alert_sequence() {
    let alerts = vec![
        alert(10000, "10.0.0.5", "2024-03-01T10:00:00Z", 0.85, &["PORT_SCAN"]),
        alert(9999, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"]),
    ];
    let (_, _, timelines) = correlate(&alerts);

    let events = &timelines[0].events;
    assert_eq!(events[0], "10:00:00 — PORT_SCAN detected (score: 0.7)");
    assert_eq!(events[1], "10:00:00 — Severity escalated to CRITICAL");
}

#[test]
fn test_campaign_boundaries() {
    let t = CampaignThresholds::default();
    assert_eq!(classify_campaign(1, &t), CampaignType::SingleEvent);
    assert_eq!(classify_campaign(2, &t), CampaignType::RepeatedActivity);
    assert_eq!(classify_campaign(4, &t), CampaignType::RepeatedActivity);
    assert_eq!(classify_campaign(5, &t), CampaignType::ActiveCampaign);
    assert_eq!(classify_campaign(0, &t), CampaignType::SingleEvent);
}

#[test]
fn test_campaign_without_alerts_yields_empty_timeline() {
    let stray = alert(1, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"]);
    let campaigns = classify(&aggregate(&[stray]), &CampaignThresholds::default());

    let timelines = TimelineBuilder::new(&[]).build_all(&campaigns);
    assert_eq!(timelines.len(), 1);
    assert!(timelines[0].events.is_empty());
    assert_eq!(timelines[0].campaign_type, CampaignType::SingleEvent);
}

#[test]
fn test_format_score() {
    assert_eq!(format_score(1.0), "1.0");
    assert_eq!(format_score(0.0), "0.0");
    assert_eq!(format_score(0.812), "0.812");
}

#[test]
fn test_timeline_wire_names() {
    let alerts = vec![alert(1, "10.0.0.5", "2024-03-01T10:00:00Z", 0.7, &["PORT_SCAN"])];
    let (_, _, timelines) = correlate(&alerts);
    let value = serde_json::to_value(&timelines[0]).unwrap();

    assert_eq!(value["entity"], "10.0.0.5");
    assert_eq!(value["rule"], "PORT_SCAN");
    assert_eq!(value["campaign_type"], "single_event");
    assert_eq!(value["timeline"].as_array().unwrap().len(), 1);
}
