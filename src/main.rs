use std::io::Write;
use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anemia_core::{
    CoreConfig, StageSequencer, action_required_policy_from_env_value,
    constants::ACTION_REQUIRED_POLICY_ENV, walk_pathway,
};
use anemia_wire::{RecordReport, Report, load_records_dir};

/// Counts reported once a batch has been written.
#[derive(Debug, Default, PartialEq, Eq)]
struct BatchSummary {
    evaluated: usize,
    failed: usize,
}

/// Main entry point for the batch runner
///
/// Walks every record document in the records directory through the pathway and writes one
/// JSON line per document to stdout. Documents that fail to parse are reported on their own
/// line and do not stop the batch.
///
/// # Environment Variables
/// - `ANEMIA_RECORDS_DIR`: Directory of record documents (default: "records")
/// - `ANEMIA_ACTION_REQUIRED_POLICY`: `advisory` (default) or `blocking`
///
/// # Returns
/// * `Ok(())` - If the batch was written
/// * `Err(anyhow::Error)` - If configuration is invalid or the directory cannot be read
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("anemia_run=info".parse()?)
                .add_directive("anemia_wire=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let policy =
        action_required_policy_from_env_value(std::env::var(ACTION_REQUIRED_POLICY_ENV).ok())?;
    let cfg = CoreConfig::new(policy);
    let records_dir: PathBuf = std::env::var("ANEMIA_RECORDS_DIR")
        .unwrap_or_else(|_| "records".into())
        .into();

    tracing::info!("++ Evaluating records in {}", records_dir.display());
    tracing::info!("++ Action-required policy: {}", cfg.action_required_policy());

    let stdout = std::io::stdout();
    let summary = run_batch(cfg, &records_dir, &mut stdout.lock())?;

    tracing::info!(
        "++ Done: {} evaluated, {} failed",
        summary.evaluated,
        summary.failed
    );
    Ok(())
}

fn run_batch(cfg: CoreConfig, dir: &Path, out: &mut impl Write) -> anyhow::Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for loaded in load_records_dir(dir)? {
        let source = loaded
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| loaded.path.display().to_string());

        let report = match loaded.record {
            Ok(record) => {
                let mut sequencer = StageSequencer::with_record(cfg, record);
                let outcome = walk_pathway(&mut sequencer);
                tracing::debug!("{} stopped at stage {}", source, outcome.final_stage);
                summary.evaluated += 1;
                RecordReport::evaluated(source, outcome)
            }
            Err(e) => {
                summary.failed += 1;
                RecordReport::failed(source, &e)
            }
        };

        writeln!(out, "{}", Report::record_line(&report)?)?;
    }

    Ok(summary)
}
