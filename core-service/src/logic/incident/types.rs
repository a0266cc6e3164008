use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::NO_RULE_TRIGGER;
use crate::logic::threat::Severity;

// ============================================================================
// GROUPING KEY
// ============================================================================

/// (entity, trigger). Entity is the alert's source IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IncidentKey {
    pub entity: String,
    pub trigger: String,
}

impl IncidentKey {
    pub fn new(entity: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            trigger: trigger.into(),
        }
    }

    pub fn is_no_rule(&self) -> bool {
        self.trigger == NO_RULE_TRIGGER
    }
}

// ============================================================================
// AGGREGATED INCIDENT
// ============================================================================

/// Per-key summary, recomputed from the full alert set every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIncident {
    pub entity: String,
    #[serde(rename = "rule", alias = "trigger")]
    pub trigger: String,
    pub alert_count: usize,
    pub max_severity: Severity,
    pub avg_score: f64,
    #[serde(with = "crate::logic::timestamp")]
    pub first_seen: DateTime<Utc>,
    #[serde(with = "crate::logic::timestamp")]
    pub last_seen: DateTime<Utc>,
}

impl AggregatedIncident {
    pub fn key(&self) -> IncidentKey {
        IncidentKey::new(self.entity.clone(), self.trigger.clone())
    }
}

// ============================================================================
// CAMPAIGN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    SingleEvent,
    RepeatedActivity,
    ActiveCampaign,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::SingleEvent => "single_event",
            CampaignType::RepeatedActivity => "repeated_activity",
            CampaignType::ActiveCampaign => "active_campaign",
        }
    }
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incident annotated with its campaign type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(flatten)]
    pub incident: AggregatedIncident,
    pub campaign_type: CampaignType,
}

/// alert_count cut-offs (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignThresholds {
    /// alert_count at or above this is an active campaign
    pub active_min_alerts: usize,
    /// alert_count at or above this is repeated activity
    pub repeated_min_alerts: usize,
}

impl Default for CampaignThresholds {
    fn default() -> Self {
        Self {
            active_min_alerts: 5,
            repeated_min_alerts: 2,
        }
    }
}

// ============================================================================
// TIMELINE
// ============================================================================

/// Narrated events for one key, ascending by alert timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub entity: String,
    #[serde(rename = "rule", alias = "trigger")]
    pub trigger: String,
    pub campaign_type: CampaignType,
    #[serde(rename = "timeline", alias = "events")]
    pub events: Vec<String>,
}
