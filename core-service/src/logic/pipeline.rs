//! Detection Pipeline
//!
//! flows + anomaly scores → join → fit bounds → score/label → alerts
//! → aggregate → campaigns → timelines
//!
//! Each stage consumes its full input before the next starts. Only per-flow
//! scoring runs concurrently, and only after the normalization bounds are
//! fixed for the whole batch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::logic::alert::{Alert, AlertBuilder};
use crate::logic::config::EngineConfig;
use crate::logic::flow::{join_anomaly_scores, AnomalyEntry, FlowInput, FlowRecord};
use crate::logic::incident::{
    aggregate, classify, AggregatedIncident, Campaign, CampaignThresholds, Timeline, TimelineBuilder,
};
use crate::logic::rules::RuleSet;
use crate::logic::threat::{assign_label, ScoreFusion, ScoredFlow, Severity, ThreatLabel};
use crate::logic::timestamp::parse_required;

// ============================================================================
// REPORTS
// ============================================================================

/// Aggregator → CampaignClassifier → TimelineBuilder output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub incidents: Vec<AggregatedIncident>,
    pub campaigns: Vec<Campaign>,
    pub timelines: Vec<Timeline>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub flows: usize,
    pub alerts: usize,
    pub incidents: usize,
    pub by_label: BTreeMap<ThreatLabel, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl RunStats {
    fn collect(scored: &[ScoredFlow], alerts: &[Alert], correlation: &CorrelationReport) -> Self {
        let mut by_label = BTreeMap::new();
        for flow in scored {
            *by_label.entry(flow.label).or_insert(0) += 1;
        }

        let mut by_severity = BTreeMap::new();
        for alert in alerts {
            *by_severity.entry(alert.severity).or_insert(0) += 1;
        }

        Self {
            flows: scored.len(),
            alerts: alerts.len(),
            incidents: correlation.incidents.len(),
            by_label,
            by_severity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub stats: RunStats,
    pub alerts: Vec<Alert>,
    pub correlation: CorrelationReport,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct DetectionPipeline {
    config: EngineConfig,
    rules: RuleSet,
}

impl DetectionPipeline {
    /// Pipeline with the built-in detectors
    pub fn new(config: EngineConfig) -> Self {
        let rules = RuleSet::with_defaults(&config.detectors);
        Self { config, rules }
    }

    /// Pipeline with a caller-built rule set replacing the built-ins
    pub fn with_rule_set(config: EngineConfig, rules: RuleSet) -> Self {
        Self { config, rules }
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Full run. Any validation failure aborts before a single alert exists.
    pub fn run(&self, flows: Vec<FlowRecord>, anomaly: &[AnomalyEntry]) -> EngineResult<DetectionReport> {
        let run_id = Uuid::new_v4();
        log::info!("Run {} started: {} flows, {} anomaly scores", run_id, flows.len(), anomaly.len());

        let inputs = join_anomaly_scores(flows, anomaly)?;
        let scored = self.score(&inputs)?;

        let mut builder = AlertBuilder::new(self.config.indicators.clone(), self.config.timestamp_source);
        let alerts: Vec<Alert> = scored.iter().filter_map(|flow| builder.build(flow)).collect();
        log::info!("Built {} alerts from {} flows", alerts.len(), scored.len());

        let correlation = correlate(&alerts, &self.config.campaigns);
        let stats = RunStats::collect(&scored, &alerts, &correlation);

        log::info!(
            "Run {} finished: {} alerts, {} incidents, {} timelines",
            run_id,
            stats.alerts,
            stats.incidents,
            correlation.timelines.len()
        );

        Ok(DetectionReport {
            run_id,
            generated_at: Utc::now(),
            stats,
            alerts,
            correlation,
        })
    }

    /// Rule evaluation, fusion and labeling for a joined batch.
    /// Pass 1 fixes normalization bounds, pass 2 scores flows (in parallel
    /// when `worker_threads > 1`). Output keeps input order.
    pub fn score(&self, inputs: &[FlowInput]) -> EngineResult<Vec<ScoredFlow>> {
        let observed = flow_timestamps(inputs)?;
        let fusion = ScoreFusion::fit(inputs, &self.config.fusion);

        let workers = self.config.worker_threads.max(1).min(inputs.len().max(1));
        if workers == 1 {
            return Ok(inputs
                .iter()
                .enumerate()
                .map(|(index, input)| self.score_one(&fusion, index, input, observed[index]))
                .collect());
        }

        let chunk_size = inputs.len().div_ceil(workers);
        log::debug!("Scoring {} flows on {} workers", inputs.len(), workers);

        let fusion = &fusion;
        let observed = observed.as_slice();
        let scored: Vec<ScoredFlow> = std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let offset = chunk_index * chunk_size;
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(i, input)| {
                                let index = offset + i;
                                self.score_one(fusion, index, input, observed[index])
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        Ok(scored)
    }

    fn score_one(
        &self,
        fusion: &ScoreFusion,
        index: usize,
        input: &FlowInput,
        observed_at: Option<DateTime<Utc>>,
    ) -> ScoredFlow {
        let findings = self.rules.evaluate(&input.flow);
        for finding in &findings {
            log::debug!("Flow #{} triggered {} (+{})", index, finding.rule, finding.severity_boost);
        }

        let breakdown = fusion.fuse(input.flow.suspicion_score(), input.anomaly_score, &findings);
        let label = assign_label(&input.flow, breakdown.final_score, &self.config.labels);

        ScoredFlow {
            index,
            flow: input.flow.clone(),
            observed_at,
            findings,
            breakdown,
            label,
        }
    }
}

/// Aggregate, classify and narrate an existing alert set
pub fn correlate(alerts: &[Alert], thresholds: &CampaignThresholds) -> CorrelationReport {
    let incidents = aggregate(alerts);
    let campaigns = classify(&incidents, thresholds);
    let timelines = TimelineBuilder::new(alerts).build_all(&campaigns);

    CorrelationReport {
        incidents,
        campaigns,
        timelines,
    }
}

/// Parse every present `first_seen`/`last_seen`. Malformed values are fatal.
fn flow_timestamps(inputs: &[FlowInput]) -> EngineResult<Vec<Option<DateTime<Utc>>>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            if let Some(raw) = input.flow.last_seen.as_deref() {
                parse_required(raw, format!("flow #{} last_seen", index))?;
            }
            input
                .flow
                .first_seen
                .as_deref()
                .map(|raw| parse_required(raw, format!("flow #{} first_seen", index)))
                .transpose()
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
