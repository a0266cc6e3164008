//! Score Fusion
//!
//! Input: raw rule suspicion score, raw anomaly score, detector findings
//! Output: ScoreBreakdown (final score in [0, 1])
//!
//! Normalization is batch-wide, so fusion runs in two passes:
//! `ScoreFusion::fit` collects min/max over the whole batch, then `fuse`
//! is applied per flow and can run on any thread.

use super::rules::{FusionConfig, NormalizationBounds, CONFIDENCE_PER_DETECTOR};
use super::types::ScoreBreakdown;
use crate::logic::flow::FlowInput;
use crate::logic::rules::Finding;

// ============================================================================
// NORMALIZATION
// ============================================================================

impl NormalizationBounds {
    /// Min/max over a batch. `None` for an empty batch.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(b) => Some(Self { min: b.min.min(v), max: b.max.max(v) }),
        })
    }

    /// Min-max scale into [0, 1]. A zero-width range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }
}

// ============================================================================
// SCORE FUSION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScoreFusion {
    rule_weight: f64,
    anomaly_weight: f64,
    rule_bounds: NormalizationBounds,
    anomaly_bounds: NormalizationBounds,
}

impl ScoreFusion {
    /// Pass 1: fix normalization bounds (configured ones win over batch ones)
    pub fn fit(inputs: &[FlowInput], config: &FusionConfig) -> Self {
        let empty = NormalizationBounds { min: 0.0, max: 0.0 };

        let rule_bounds = config.rule_bounds.unwrap_or_else(|| {
            NormalizationBounds::from_values(inputs.iter().map(|i| i.flow.suspicion_score()))
                .unwrap_or(empty)
        });
        let anomaly_bounds = config.anomaly_bounds.unwrap_or_else(|| {
            NormalizationBounds::from_values(inputs.iter().map(|i| i.anomaly_score))
                .unwrap_or(empty)
        });

        log::debug!(
            "Fusion bounds: rule [{}, {}], anomaly [{}, {}]",
            rule_bounds.min, rule_bounds.max, anomaly_bounds.min, anomaly_bounds.max
        );

        Self {
            rule_weight: config.rule_weight,
            anomaly_weight: config.anomaly_weight,
            rule_bounds,
            anomaly_bounds,
        }
    }

    /// Pass 2: fuse one flow's scores and detector boosts
    pub fn fuse(&self, raw_rule: f64, raw_anomaly: f64, findings: &[Finding]) -> ScoreBreakdown {
        let rule_score = self.rule_bounds.normalize(raw_rule);
        let anomaly_score = self.anomaly_bounds.normalize(raw_anomaly);

        let rule_contribution = self.rule_weight * rule_score;
        let anomaly_contribution = self.anomaly_weight * anomaly_score;
        let severity_boost: f64 = findings.iter().map(|f| f.severity_boost).sum();

        let final_score = (rule_contribution + anomaly_contribution + severity_boost).clamp(0.0, 1.0);

        ScoreBreakdown {
            rule_score,
            anomaly_score,
            rule_contribution,
            anomaly_contribution,
            severity_boost,
            final_score,
        }
    }
}

/// Confidence = min(score + 0.1 per triggered detector, 1.0), 2 decimals
pub fn confidence(final_score: f64, triggered_detectors: usize) -> f64 {
    let raw = final_score + CONFIDENCE_PER_DETECTOR * triggered_detectors as f64;
    round_to(raw.min(1.0), 2)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// TESTS
// ============================================================================
