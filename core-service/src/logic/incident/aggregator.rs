//! Alert Aggregator
//!
//! Reduces the full alert set to one `AggregatedIncident` per (entity, trigger).
//! An alert that fired several detectors counts once under each of them; an
//! alert that fired none is grouped under `NO_RULE`.

use std::collections::BTreeMap;

use super::types::{AggregatedIncident, IncidentKey};
use crate::constants::NO_RULE_TRIGGER;
use crate::logic::alert::Alert;
use crate::logic::threat::{round_to, Severity};

/// Bucket alerts by key. BTreeMap keeps output sorted by (entity, trigger).
pub fn group_alerts(alerts: &[Alert]) -> BTreeMap<IncidentKey, Vec<&Alert>> {
    let mut groups: BTreeMap<IncidentKey, Vec<&Alert>> = BTreeMap::new();

    for alert in alerts {
        if alert.triggered_rules.is_empty() {
            groups
                .entry(IncidentKey::new(alert.src_ip.clone(), NO_RULE_TRIGGER))
                .or_default()
                .push(alert);
            continue;
        }

        let mut seen: Vec<&str> = Vec::with_capacity(alert.triggered_rules.len());
        for rule in &alert.triggered_rules {
            if seen.contains(&rule.as_str()) {
                continue;
            }
            seen.push(rule);
            groups
                .entry(IncidentKey::new(alert.src_ip.clone(), rule.clone()))
                .or_default()
                .push(alert);
        }
    }

    groups
}

/// Aggregate every group. Input order never affects the result.
pub fn aggregate(alerts: &[Alert]) -> Vec<AggregatedIncident> {
    let incidents: Vec<AggregatedIncident> = group_alerts(alerts)
        .into_iter()
        .filter_map(|(key, group)| summarize(key, &group))
        .collect();

    log::info!(
        "Aggregated {} alerts into {} incidents",
        alerts.len(),
        incidents.len()
    );
    incidents
}

fn summarize(key: IncidentKey, group: &[&Alert]) -> Option<AggregatedIncident> {
    let first = group.first()?;

    let mut max_severity = Severity::Unknown;
    let mut first_seen = first.timestamp;
    let mut last_seen = first.timestamp;
    let mut total = 0.0;

    for alert in group {
        if alert.severity.rank() > max_severity.rank() {
            max_severity = alert.severity;
        }
        first_seen = first_seen.min(alert.timestamp);
        last_seen = last_seen.max(alert.timestamp);
        total += alert.final_threat_score;
    }

    let alert_count = group.len();
    log::debug!(
        "Incident {}/{}: {} alerts, max {}",
        key.entity,
        key.trigger,
        alert_count,
        max_severity
    );

    Some(AggregatedIncident {
        entity: key.entity,
        trigger: key.trigger,
        alert_count,
        max_severity,
        avg_score: round_to(total / alert_count as f64, 3),
        first_seen,
        last_seen,
    })
}
