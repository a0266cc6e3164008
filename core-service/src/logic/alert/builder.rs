//! Alert Builder
//!
//! Input: ScoredFlow (labeled, with findings)
//! Output: Alert, or nothing for BENIGN flows
//!
//! Alert ids are sequential per builder, so every run (and every test) owns
//! its own counter.

use chrono::Utc;

use super::types::{Alert, IndicatorThresholds, TimestampSource};
use crate::logic::flow::FlowRecord;
use crate::logic::threat::{confidence, round_to, ScoredFlow, Severity, ThreatType};

const FALLBACK_INDICATOR: &str = "statistical anomaly in flow behavior";

pub struct AlertBuilder {
    thresholds: IndicatorThresholds,
    timestamp_source: TimestampSource,
    issued: u32,
}

impl AlertBuilder {
    pub fn new(thresholds: IndicatorThresholds, timestamp_source: TimestampSource) -> Self {
        Self {
            thresholds,
            timestamp_source,
            issued: 0,
        }
    }

    /// Number of alerts issued so far
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Build an alert for a non-benign flow. BENIGN flows consume no id.
    pub fn build(&mut self, scored: &ScoredFlow) -> Option<Alert> {
        if scored.label.is_benign() {
            return None;
        }

        let flow = &scored.flow;
        let missing = flow.defaulted_tuple_fields();
        if !missing.is_empty() {
            log::warn!("Flow #{} missing {:?}, using defaults", scored.index, missing);
        }

        let alert_id = self.next_id();
        let timestamp = match self.timestamp_source {
            TimestampSource::Ingest => Utc::now(),
            TimestampSource::Flow => scored.observed_at.unwrap_or_else(Utc::now),
        };

        let final_threat_score = round_to(scored.breakdown.final_score, 3);
        let severity = Severity::from_score(final_threat_score);

        let mut triggered_rules: Vec<String> = Vec::with_capacity(scored.findings.len());
        for finding in &scored.findings {
            if !triggered_rules.contains(&finding.rule) {
                triggered_rules.push(finding.rule.clone());
            }
        }

        let mut indicators = feature_indicators(flow, &self.thresholds);
        indicators.extend(scored.findings.iter().map(|f| f.indicator.clone()));
        let indicators = dedup_preserving_order(indicators);

        let label = scored.label;
        let reason = format!("{} detected: {}", label, indicators.join("; "));
        let summary = format!(
            "{} severity {} from {}:{} to {}:{} over {}",
            severity,
            label,
            flow.src_ip(),
            flow.src_port(),
            flow.dst_ip(),
            flow.dst_port(),
            flow.protocol(),
        );

        Some(Alert {
            alert_id,
            timestamp,
            src_ip: flow.src_ip().to_string(),
            dst_ip: flow.dst_ip().to_string(),
            src_port: flow.src_port(),
            dst_port: flow.dst_port(),
            protocol: flow.protocol().to_string(),
            threat_label: label,
            threat_type: ThreatType::from(label),
            severity,
            final_threat_score,
            confidence: confidence(scored.breakdown.final_score, triggered_rules.len()),
            triggered_rules,
            indicators,
            reason,
            summary,
            score_breakdown: Some(scored.breakdown.clone()),
        })
    }

    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("ALERT-{:04}", self.issued)
    }
}

impl Default for AlertBuilder {
    fn default() -> Self {
        Self::new(IndicatorThresholds::default(), TimestampSource::default())
    }
}

/// Indicators from raw feature thresholds. Absent features never fire.
pub fn feature_indicators(flow: &FlowRecord, t: &IndicatorThresholds) -> Vec<String> {
    let mut indicators = Vec::new();

    if flow.packet_count.is_some_and(|n| n > t.high_packet_count) {
        indicators.push("abnormally high packet count".to_string());
    }
    if flow.duration.is_some_and(|d| d < t.short_duration_secs) {
        indicators.push("very short-lived flow".to_string());
    }
    if flow.mean_iat.is_some_and(|iat| iat < t.fast_inter_arrival_secs) {
        indicators.push("rapid packet inter-arrival times".to_string());
    }

    if indicators.is_empty() {
        indicators.push(FALLBACK_INDICATOR.to_string());
    }
    indicators
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

// ============================================================================
// TESTS
// ============================================================================
