use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use tracing::info;
use crate::config::Settings;
use crate::countries::CountryTable;
use crate::error::Result;
use crate::extractors::ProductSource;
use crate::models::Dataset;
use crate::services::{gather_all, GatherReport};
use crate::storage::CsvStore;
use crate::utils::dated_filename;

#[derive(Debug)]
pub enum PipelineOutcome {
    /// An existing dataset was found and used as-is.
    Loaded { path: PathBuf, dataset: Dataset },
    Fetched { path: PathBuf, report: GatherReport },
}

impl PipelineOutcome {
    pub fn dataset(&self) -> &Dataset {
        match self {
            PipelineOutcome::Loaded { dataset, .. } => dataset,
            PipelineOutcome::Fetched { report, .. } => &report.dataset,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PipelineOutcome::Loaded { path, .. } | PipelineOutcome::Fetched { path, .. } => path,
        }
    }
}

pub async fn run<S>(settings: &Settings, source: &S) -> Result<PipelineOutcome>
where
    S: ProductSource + ?Sized,
{
    run_at(settings, source, Utc::now()).await
}

pub async fn run_at<S>(settings: &Settings, source: &S, now: DateTime<Utc>) -> Result<PipelineOutcome>
where
    S: ProductSource + ?Sized,
{
    let existing = PathBuf::from(&settings.output.existing_path);
    if existing.is_file() {
        info!(path = %existing.display(), "Found existing dataset, skipping fetch");
        let dataset = CsvStore::load(&existing)?;
        return Ok(PipelineOutcome::Loaded { path: existing, dataset });
    }

    let pipeline = &settings.pipeline;
    let table = CountryTable::for_kind(pipeline.country_table, &pipeline.countries)?;
    let fields = Some(pipeline.fields.as_slice());

    info!(
        countries = table.len(),
        country_table = ?pipeline.country_table,
        on_country_failure = ?pipeline.on_country_failure,
        "Starting extraction"
    );

    let report = gather_all(source, fields, &table, pipeline.on_country_failure).await?;

    let filename = dated_filename(&settings.output.prefix, &now, settings.output.include_time);
    let path = Path::new(&settings.output.dir).join(filename);
    CsvStore::write(&report.dataset, &path)?;

    Ok(PipelineOutcome::Fetched { path, report })
}
