//! Timeline Builder
//!
//! Re-reads the full alert stream per campaign key and narrates it.
//! Narration is a two-state walk over alerts in timestamp order: an event is
//! an escalation when the severity differs from the previous alert's,
//! otherwise a routine detection. The first event is always routine.

use std::collections::BTreeMap;

use super::aggregator::group_alerts;
use super::types::{Campaign, IncidentKey, Timeline};
use crate::logic::alert::Alert;
use crate::logic::threat::Severity;

const TIME_FORMAT: &str = "%H:%M:%S";

pub struct TimelineBuilder<'a> {
    by_key: BTreeMap<IncidentKey, Vec<&'a Alert>>,
}

impl<'a> TimelineBuilder<'a> {
    /// Index the full alert set once; every timeline selects from it
    pub fn new(alerts: &'a [Alert]) -> Self {
        Self {
            by_key: group_alerts(alerts),
        }
    }

    pub fn build(&self, campaign: &Campaign) -> Timeline {
        let key = campaign.incident.key();
        let events = match self.by_key.get(&key) {
            Some(group) => narrate(group, &key.trigger),
            None => {
                log::debug!("No alerts for {}/{}, empty timeline", key.entity, key.trigger);
                Vec::new()
            }
        };

        Timeline {
            entity: key.entity,
            trigger: key.trigger,
            campaign_type: campaign.campaign_type,
            events,
        }
    }

    pub fn build_all(&self, campaigns: &[Campaign]) -> Vec<Timeline> {
        campaigns.iter().map(|c| self.build(c)).collect()
    }
}

/// Narrate one key's alerts. Ties on timestamp fall back to the alert
/// sequence number, then to the raw id for ids without one.
pub fn narrate(alerts: &[&Alert], trigger: &str) -> Vec<String> {
    let mut ordered: Vec<&Alert> = alerts.to_vec();
    ordered.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| alert_sequence(&a.alert_id).cmp(&alert_sequence(&b.alert_id)))
            .then_with(|| a.alert_id.cmp(&b.alert_id))
    });

    let mut last_severity: Option<Severity> = None;
    let mut events = Vec::with_capacity(ordered.len());

    for alert in ordered {
        let time = alert.timestamp.format(TIME_FORMAT);
        let event = match last_severity {
            Some(previous) if previous != alert.severity => {
                format!("{} — Severity escalated to {}", time, alert.severity)
            }
            _ => format!(
                "{} — {} detected (score: {})",
                time,
                trigger,
                format_score(alert.final_threat_score)
            ),
        };
        events.push(event);
        last_severity = Some(alert.severity);
    }

    events
}

/// Numeric suffix of an `ALERT-NNNN` id ("ALERT-10000" -> 10000)
fn alert_sequence(alert_id: &str) -> Option<u64> {
    alert_id.rsplit('-').next().and_then(|n| n.parse().ok())
}

/// Shortest round-trip form, always with a fractional part ("1.0", "0.812")
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}
