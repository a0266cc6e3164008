use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::{AGGREGATED_FILE, ALERTS_FILE, CAMPAIGNS_FILE, TIMELINES_FILE};
use crate::error::{EngineError, EngineResult};
use crate::logic::alert::Alert;
use crate::logic::pipeline::CorrelationReport;

const TMP_SUFFIX: &str = ".tmp";

/// Writes report files as one set: either every file lands or none does
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// alerts.json, aggregated_alerts.json, campaigns.json, timelines.json
    pub fn write_report(&self, alerts: &[Alert], correlation: &CorrelationReport) -> EngineResult<Vec<PathBuf>> {
        let files = vec![
            (ALERTS_FILE, to_pretty(ALERTS_FILE, alerts)?),
            (AGGREGATED_FILE, to_pretty(AGGREGATED_FILE, &correlation.incidents)?),
            (CAMPAIGNS_FILE, to_pretty(CAMPAIGNS_FILE, &correlation.campaigns)?),
            (TIMELINES_FILE, to_pretty(TIMELINES_FILE, &correlation.timelines)?),
        ];
        self.commit(files)
    }

    /// Correlation files only; an existing alerts file is left alone
    pub fn write_correlation(&self, correlation: &CorrelationReport) -> EngineResult<Vec<PathBuf>> {
        let files = vec![
            (AGGREGATED_FILE, to_pretty(AGGREGATED_FILE, &correlation.incidents)?),
            (CAMPAIGNS_FILE, to_pretty(CAMPAIGNS_FILE, &correlation.campaigns)?),
            (TIMELINES_FILE, to_pretty(TIMELINES_FILE, &correlation.timelines)?),
        ];
        self.commit(files)
    }

    /// Stage every file under a temporary name, then rename them all.
    fn commit(&self, files: Vec<(&str, String)>) -> EngineResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
        for (name, body) in files {
            let target = self.dir.join(name);
            let tmp = self.dir.join(format!("{}{}", name, TMP_SUFFIX));
            if let Err(e) = fs::write(&tmp, body) {
                discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(EngineError::io(&tmp, e));
            }
            staged.push((tmp, target));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (index, (tmp, target)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, target) {
                discard(&staged[index..]);
                return Err(EngineError::io(target, e));
            }
            written.push(target.clone());
        }

        log::info!("Wrote {} report files to {}", written.len(), self.dir.display());
        Ok(written)
    }
}

fn to_pretty<T: Serialize + ?Sized>(name: &str, value: &T) -> EngineResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| EngineError::json(name, e))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            log::warn!("Could not remove staged file {}: {}", tmp.display(), e);
        }
    }
}
