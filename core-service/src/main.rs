//! Flow Sentinel - CLI Entry Point

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use flow_sentinel::constants::{self, APP_NAME, APP_VERSION};
use flow_sentinel::logic::config::EngineConfig;
use flow_sentinel::logic::dataset::{load_alerts, load_anomaly_scores, load_flows, ReportWriter};
use flow_sentinel::logic::pipeline::{correlate, DetectionPipeline};
use flow_sentinel::EngineError;

const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(name = "flow-sentinel", about = "Flow detection and alert correlation", version)]
struct Cli {
    /// JSON engine config (defaults apply to missing keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (default: $SENTINEL_OUTPUT_DIR or ./outputs)
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score flows, build alerts and correlate them
    Detect {
        /// Flow records (JSON array or JSONL)
        #[arg(long)]
        flows: PathBuf,
        /// Anomaly scores, one per flow (JSON array or JSONL)
        #[arg(long)]
        scores: PathBuf,
    },
    /// Re-run aggregation, campaigns and timelines over an alerts file
    Correlate {
        #[arg(long)]
        alerts: PathBuf,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("{} v{}", APP_NAME, APP_VERSION);

    if let Err(e) = run(cli) {
        eprintln!("run aborted: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// 2 when the input batch itself was rejected, 1 for everything else
fn exit_code(err: &anyhow::Error) -> i32 {
    let rejected_input = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<EngineError>())
        .any(EngineError::is_input_validation);
    if rejected_input {
        EXIT_INPUT_REJECTED
    } else {
        EXIT_FAILURE
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EngineConfig::load(cli.config.as_deref()).context("loading engine config")?;
    let out = cli
        .out
        .unwrap_or_else(|| PathBuf::from(constants::get_output_dir()));
    let writer = ReportWriter::new(out);

    match cli.command {
        Commands::Detect { flows, scores } => {
            let flows = load_flows(&flows).context("reading flows")?;
            let scores = load_anomaly_scores(&scores).context("reading anomaly scores")?;

            let pipeline = DetectionPipeline::new(config);
            let report = pipeline.run(flows, &scores)?;
            writer
                .write_report(&report.alerts, &report.correlation)
                .context("writing report")?;

            println!("{}", serde_json::to_string_pretty(&report.stats)?);
            log::info!("Run {} written to {}", report.run_id, writer.dir().display());
        }
        Commands::Correlate { alerts } => {
            let alerts = load_alerts(&alerts).context("reading alerts")?;
            let correlation = correlate(&alerts, &config.campaigns);
            writer
                .write_correlation(&correlation)
                .context("writing correlation")?;

            println!(
                "{} alerts -> {} incidents, {} timelines",
                alerts.len(),
                correlation.incidents.len(),
                correlation.timelines.len()
            );
        }
    }

    Ok(())
}
