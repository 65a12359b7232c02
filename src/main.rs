use std::time::Instant;
use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use off_etl::config::Settings;
use off_etl::{ApiService, PipelineOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new()?;
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    info!(timestamp = timestamp, "Starting run");

    let api = ApiService::new(settings.api.clone())?;
    let start_time = Instant::now();

    let outcome = off_etl::run(&settings, &api).await?;

    match &outcome {
        PipelineOutcome::Loaded { path, dataset } => {
            info!(
                path = %path.display(),
                rows = dataset.len(),
                "Using existing dataset"
            );
        }
        PipelineOutcome::Fetched { path, report } => {
            if !report.failed.is_empty() {
                warn!(failed = report.failed.len(), "Some countries were skipped");
            }
            info!(
                path = %path.display(),
                rows = report.dataset.len(),
                countries = report.outcomes.len(),
                minutes = format!("{:.2}", start_time.elapsed().as_secs_f64() / 60.0),
                "Extraction complete"
            );
        }
    }

    Ok(())
}
