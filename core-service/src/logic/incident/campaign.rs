//! Campaign classification. Only `alert_count` matters.

use super::types::{AggregatedIncident, Campaign, CampaignThresholds, CampaignType};

pub fn classify_campaign(alert_count: usize, thresholds: &CampaignThresholds) -> CampaignType {
    if alert_count >= thresholds.active_min_alerts {
        CampaignType::ActiveCampaign
    } else if alert_count >= thresholds.repeated_min_alerts {
        CampaignType::RepeatedActivity
    } else {
        CampaignType::SingleEvent
    }
}

pub fn classify(incidents: &[AggregatedIncident], thresholds: &CampaignThresholds) -> Vec<Campaign> {
    incidents
        .iter()
        .map(|incident| Campaign {
            campaign_type: classify_campaign(incident.alert_count, thresholds),
            incident: incident.clone(),
        })
        .collect()
}
