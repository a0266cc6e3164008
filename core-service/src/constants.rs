//! Central Configuration Constants
//!
//! Single source of truth for engine defaults and the env variables that
//! override them. Detection thresholds live in `logic::config`.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Flow Sentinel";

/// Default output directory for report files
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Default number of scoring workers (1 = score on the calling thread)
pub const DEFAULT_WORKER_THREADS: usize = 1;

/// Trigger name used for alerts that no detector fired on
pub const NO_RULE_TRIGGER: &str = "NO_RULE";

/// Sentinel for absent IP / protocol fields
pub const UNKNOWN_FIELD: &str = "unknown";

/// Sentinel for absent ports
pub const UNKNOWN_PORT: i32 = -1;

// Report file names (consumed by dashboards, do not rename)
pub const ALERTS_FILE: &str = "alerts.json";
pub const AGGREGATED_FILE: &str = "aggregated_alerts.json";
pub const CAMPAIGNS_FILE: &str = "campaigns.json";
pub const TIMELINES_FILE: &str = "timelines.json";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get output directory from environment or use default
pub fn get_output_dir() -> String {
    std::env::var("SENTINEL_OUTPUT_DIR")
        .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
}

/// Get worker thread count from environment, if set and valid
pub fn get_worker_threads() -> Option<usize> {
    std::env::var("SENTINEL_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
}

/// Get timestamp source ("ingest" or "flow") from environment, if set
pub fn get_timestamp_source() -> Option<String> {
    std::env::var("SENTINEL_TIMESTAMP_SOURCE")
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}
