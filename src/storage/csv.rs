use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use crate::error::Result;
use crate::models::{Dataset, EnrichedProduct, Nutriments, Product};

/// Flat on-disk shape of one [`EnrichedProduct`].
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    code: String,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: String,
    #[serde(default)]
    countries_tags: String,
    kcal_per100: f64,
    #[serde(default)]
    country: Option<String>,
}

impl CsvRow {
    fn from_enriched(row: &EnrichedProduct) -> Result<Self> {
        let nutriments = match &row.product.nutriments {
            Nutriments::Absent => String::new(),
            // Keep whatever text arrived rather than re-quoting it.
            Nutriments::Malformed(Value::String(s)) => s.clone(),
            other => serde_json::to_string(&other.to_value())?,
        };

        Ok(Self {
            code: row.product.code.clone(),
            product_name: row.product.product_name.clone(),
            nutriments,
            countries_tags: serde_json::to_string(&row.product.countries_tags)?,
            kcal_per100: row.kcal_per100,
            country: row.country.clone(),
        })
    }

    fn into_enriched(self) -> EnrichedProduct {
        let nutriments = match self.nutriments.trim() {
            "" => Nutriments::Absent,
            text => serde_json::from_str::<Value>(text)
                .map(Nutriments::from)
                .unwrap_or_else(|_| Nutriments::Malformed(Value::String(text.to_string()))),
        };

        EnrichedProduct {
            product: Product {
                code: self.code,
                product_name: self.product_name.filter(|n| !n.is_empty()),
                nutriments,
                countries_tags: parse_tags(&self.countries_tags),
            },
            country: self.country.filter(|c| !c.is_empty()),
            kcal_per100: self.kcal_per100,
        }
    }
}

/// Accepts a JSON array, or the `['en:france', 'en:spain']` list repr that
/// older exports of this dataset contain.
fn parse_tags(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(text) {
        return tags;
    }

    text.trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|t| t.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub struct CsvStore;

impl CsvStore {
    /// Write `dataset` to `path`, replacing any previous file atomically.
    pub fn write(dataset: &Dataset, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            for row in dataset.rows() {
                writer.serialize(CsvRow::from_enriched(row)?)?;
            }
            // Header-only output when there are no rows.
            if dataset.is_empty() {
                writer.write_record([
                    "code",
                    "product_name",
                    "nutriments",
                    "countries_tags",
                    "kcal_per100",
                    "country",
                ])?;
            }
            writer.flush()?;
        }
        temp.persist(path)?;

        info!(
            path = %path.display(),
            rows = dataset.len(),
            "Wrote dataset"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Dataset> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut dataset = Dataset::new();

        for record in reader.deserialize::<CsvRow>() {
            dataset.extend([record?.into_enriched()]);
        }

        debug!(path = %path.display(), rows = dataset.len(), "Loaded dataset");
        Ok(dataset)
    }
}
