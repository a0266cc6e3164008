//! Incident Correlation Module
//!
//! Alerts → AggregatedIncident (per entity + trigger) → Campaign → Timeline.
//! Every stage is recomputed from the full alert set; nothing is incremental.

pub mod types;
pub mod aggregator;
pub mod campaign;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use types::{AggregatedIncident, Campaign, CampaignThresholds, CampaignType, IncidentKey, Timeline};
pub use aggregator::{aggregate, group_alerts};
pub use campaign::{classify, classify_campaign};
pub use timeline::{format_score, narrate, TimelineBuilder};
