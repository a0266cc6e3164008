//! Engine Configuration
//!
//! Layering: defaults → optional JSON file → env overrides → `validate()`.
//! Every section is `#[serde(default)]`, so a config file only needs the
//! keys it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_WORKER_THREADS};
use crate::error::{EngineError, EngineResult};
use crate::logic::alert::IndicatorThresholds;
use crate::logic::incident::CampaignThresholds;
use crate::logic::rules::DetectorThresholds;
use crate::logic::threat::{FusionConfig, LabelThresholds, NormalizationBounds};

pub use crate::logic::alert::TimestampSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fusion: FusionConfig,
    pub labels: LabelThresholds,
    pub detectors: DetectorThresholds,
    pub indicators: IndicatorThresholds,
    pub campaigns: CampaignThresholds,
    pub timestamp_source: TimestampSource,
    /// Scoring workers; 1 scores on the calling thread
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fusion: FusionConfig::default(),
            labels: LabelThresholds::default(),
            detectors: DetectorThresholds::default(),
            indicators: IndicatorThresholds::default(),
            campaigns: CampaignThresholds::default(),
            timestamp_source: TimestampSource::default(),
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

impl EngineConfig {
    /// High sensitivity - lower thresholds, more alerts
    pub fn high_sensitivity() -> Self {
        Self {
            labels: LabelThresholds::high_sensitivity(),
            detectors: DetectorThresholds {
                port_scan_min_ports: 10,
                dns_min_packets_per_second: 2.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Low sensitivity - higher thresholds, fewer alerts
    pub fn low_sensitivity() -> Self {
        Self {
            labels: LabelThresholds::low_sensitivity(),
            detectors: DetectorThresholds {
                port_scan_min_ports: 50,
                dns_min_packets_per_second: 10.0,
                ..Default::default()
            },
            campaigns: CampaignThresholds {
                active_min_alerts: 10,
                repeated_min_alerts: 3,
            },
            ..Default::default()
        }
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|e| EngineError::json(path, e))?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Apply `SENTINEL_*` env overrides
    pub fn apply_env(&mut self) -> EngineResult<()> {
        if let Some(threads) = constants::get_worker_threads() {
            log::debug!("worker_threads overridden by env: {}", threads);
            self.worker_threads = threads;
        }

        if let Some(source) = constants::get_timestamp_source() {
            self.timestamp_source = source.parse().map_err(EngineError::InvalidConfig)?;
            log::debug!("timestamp_source overridden by env: {:?}", self.timestamp_source);
        }

        Ok(())
    }

    /// Defaults, optional file, env, validation
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let fusion = &self.fusion;
        if !(fusion.rule_weight >= 0.0 && fusion.anomaly_weight >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "fusion weights must be non-negative (rule {}, anomaly {})",
                fusion.rule_weight, fusion.anomaly_weight
            )));
        }
        if fusion.rule_weight + fusion.anomaly_weight <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "fusion weights must sum to a positive value".to_string(),
            ));
        }

        check_bounds("rule_bounds", fusion.rule_bounds)?;
        check_bounds("anomaly_bounds", fusion.anomaly_bounds)?;

        let campaigns = &self.campaigns;
        if campaigns.repeated_min_alerts == 0
            || campaigns.active_min_alerts < campaigns.repeated_min_alerts
        {
            return Err(EngineError::InvalidConfig(format!(
                "campaign thresholds must satisfy 0 < repeated ({}) <= active ({})",
                campaigns.repeated_min_alerts, campaigns.active_min_alerts
            )));
        }

        if self.worker_threads == 0 {
            return Err(EngineError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_bounds(name: &str, bounds: Option<NormalizationBounds>) -> EngineResult<()> {
    match bounds {
        Some(b) if !(b.min.is_finite() && b.max.is_finite() && b.min < b.max) => {
            Err(EngineError::InvalidConfig(format!(
                "{} must be finite with min < max (got {} .. {})",
                name, b.min, b.max
            )))
        }
        _ => Ok(()),
    }
}
