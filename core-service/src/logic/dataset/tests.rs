use std::fs;

use tempfile::tempdir;

use super::reader::{load_alerts, load_anomaly_scores, load_flows};
use super::writer::ReportWriter;
use crate::error::EngineError;
use crate::logic::config::{EngineConfig, TimestampSource};
use crate::logic::flow::AnomalyEntry;
use crate::logic::pipeline::{correlate, DetectionPipeline};

const FLOWS_JSON: &str = r#"[
    {"flow_id": "a", "src_ip": "10.0.0.5", "dst_ip": "10.0.0.9", "src_port": 51000,
     "dst_port": 22, "protocol": "TCP", "first_seen": "2024-03-01T10:00:00Z",
     "dst_port_count": 40, "suspicion_score": 0.9},
    {"flow_id": "b", "src_ip": "10.0.0.6", "dst_ip": "10.0.0.9", "protocol": "UDP",
     "dst_port": 53, "suspicion_score": 0.1}
]"#;

#[test]
fn test_load_json_array_and_jsonl() {
    let dir = tempdir().unwrap();

    let array = dir.path().join("flows.json");
    fs::write(&array, FLOWS_JSON).unwrap();
    let flows = load_flows(&array).unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].dst_port_count(), 40);
    assert_eq!(flows[1].src_port(), -1);

    let jsonl = dir.path().join("scores.jsonl");
    fs::write(&jsonl, "{\"flow_id\": \"a\", \"score\": 0.8}\n\n{\"flow_id\": \"b\", \"score\": 0.1}\n").unwrap();
    let scores = load_anomaly_scores(&jsonl).unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].flow_id(), Some("a"));
}

#[test]
fn test_plain_score_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scores.json");
    fs::write(&path, "[0.25, 1, 0.5]").unwrap();

    let scores = load_anomaly_scores(&path).unwrap();
    assert_eq!(scores[1], AnomalyEntry::Plain(1.0));
}

#[test]
fn test_load_errors_carry_path() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("nope.json");
    assert!(matches!(load_flows(&missing), Err(EngineError::Io { .. })));

    let broken = dir.path().join("broken.jsonl");
    fs::write(&broken, "{\"src_ip\": \"10.0.0.5\"}\n{oops\n").unwrap();
    match load_flows(&broken) {
        Err(EngineError::Json { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected JSON error, got {:?}", other.map(|f| f.len())),
    }
}

#[test]
fn test_report_round_trip_through_files() {
    let dir = tempdir().unwrap();
    let flows_path = dir.path().join("flows.json");
    let scores_path = dir.path().join("scores.json");
    fs::write(&flows_path, FLOWS_JSON).unwrap();
    fs::write(&scores_path, r#"[{"flow_id": "b", "score": 0.1}, {"flow_id": "a", "score": 0.8}]"#).unwrap();

    let flows = load_flows(&flows_path).unwrap();
    let scores = load_anomaly_scores(&scores_path).unwrap();
    let config = EngineConfig {
        timestamp_source: TimestampSource::Flow,
        ..Default::default()
    };
    let report = DetectionPipeline::new(config).run(flows, &scores).unwrap();
    assert_eq!(report.alerts.len(), 1);

    let out = dir.path().join("outputs");
    let writer = ReportWriter::new(&out);
    let written = writer.write_report(&report.alerts, &report.correlation).unwrap();
    assert_eq!(written.len(), 4);

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["aggregated_alerts.json", "alerts.json", "campaigns.json", "timelines.json"]
    );

    // Correlating the written alerts reproduces the written incidents
    let alerts = load_alerts(&out.join("alerts.json")).unwrap();
    assert_eq!(alerts, report.alerts);
    let again = correlate(&alerts, &EngineConfig::default().campaigns);
    assert_eq!(again, report.correlation);

    let timelines: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("timelines.json")).unwrap()).unwrap();
    assert_eq!(timelines[0]["entity"], "10.0.0.5");
    assert_eq!(timelines[0]["rule"], "PORT_SCAN");
}

#[test]
fn test_failed_commit_leaves_nothing_behind() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("outputs");
    fs::create_dir_all(&out).unwrap();
    // A directory where a staged file should go makes that write fail
    fs::create_dir_all(out.join("campaigns.json.tmp")).unwrap();

    let writer = ReportWriter::new(&out);
    let result = writer.write_report(&[], &Default::default());
    assert!(matches!(result, Err(EngineError::Io { .. })));

    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "campaigns.json.tmp")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}
