use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};
use crate::logic::alert::Alert;
use crate::logic::flow::{AnomalyEntry, FlowRecord};

/// Read a JSON array or JSONL file (one record per line, blanks skipped)
pub fn load_records<T: DeserializeOwned>(path: &Path) -> EngineResult<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).map_err(|e| EngineError::json(path, e));
    }

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::error!("{}:{}: {}", path.display(), line_no + 1, e);
                return Err(EngineError::json(path, e));
            }
        }
    }
    Ok(records)
}

pub fn load_flows(path: &Path) -> EngineResult<Vec<FlowRecord>> {
    let flows = load_records(path)?;
    log::info!("Loaded {} flows from {}", flows.len(), path.display());
    Ok(flows)
}

/// Bare numbers or `{"flow_id", "score"}` objects
pub fn load_anomaly_scores(path: &Path) -> EngineResult<Vec<AnomalyEntry>> {
    let scores = load_records(path)?;
    log::info!("Loaded {} anomaly scores from {}", scores.len(), path.display());
    Ok(scores)
}

pub fn load_alerts(path: &Path) -> EngineResult<Vec<Alert>> {
    let alerts = load_records(path)?;
    log::info!("Loaded {} alerts from {}", alerts.len(), path.display());
    Ok(alerts)
}
