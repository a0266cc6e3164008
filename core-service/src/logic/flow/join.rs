//! Flow / anomaly score join
//!
//! Both batches come from different collaborators. They are joined by
//! explicit `flow_id` when every score carries one, otherwise by row order.

use std::collections::HashMap;

use super::types::{AnomalyEntry, FlowInput, FlowRecord};
use crate::error::{EngineError, EngineResult};

/// Join flows with their anomaly scores. Any mismatch aborts the run.
pub fn join_anomaly_scores(
    flows: Vec<FlowRecord>,
    entries: &[AnomalyEntry],
) -> EngineResult<Vec<FlowInput>> {
    if flows.len() != entries.len() {
        return Err(EngineError::CountMismatch {
            flows: flows.len(),
            scores: entries.len(),
        });
    }

    for (index, entry) in entries.iter().enumerate() {
        let value = entry.score();
        if !value.is_finite() {
            return Err(EngineError::InvalidScore { index, value });
        }
    }

    let keyed = !entries.is_empty() && entries.iter().all(|e| e.flow_id().is_some());
    if keyed {
        join_by_key(flows, entries)
    } else {
        log::debug!("Joining {} anomaly scores by row order", entries.len());
        Ok(flows
            .into_iter()
            .zip(entries.iter())
            .map(|(flow, entry)| FlowInput { flow, anomaly_score: entry.score() })
            .collect())
    }
}

fn join_by_key(flows: Vec<FlowRecord>, entries: &[AnomalyEntry]) -> EngineResult<Vec<FlowInput>> {
    let mut by_key: HashMap<&str, f64> = HashMap::with_capacity(entries.len());
    for entry in entries {
        // Checked by the caller: every entry is keyed
        let Some(key) = entry.flow_id() else { continue };
        if by_key.insert(key, entry.score()).is_some() {
            return Err(EngineError::KeyMismatch {
                key: key.to_string(),
                reason: "duplicate anomaly score for flow".to_string(),
            });
        }
    }

    log::debug!("Joining {} anomaly scores by flow_id", entries.len());

    let mut joined = Vec::with_capacity(flows.len());
    for (index, flow) in flows.into_iter().enumerate() {
        let Some(key) = flow.flow_id.clone() else {
            return Err(EngineError::KeyMismatch {
                key: format!("#{}", index),
                reason: "flow has no flow_id but scores are keyed".to_string(),
            });
        };
        let Some(score) = by_key.remove(key.as_str()) else {
            return Err(EngineError::KeyMismatch {
                key,
                reason: "no anomaly score for flow".to_string(),
            });
        };
        joined.push(FlowInput { flow, anomaly_score: score });
    }

    Ok(joined)
}
