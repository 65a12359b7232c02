use std::fmt;
use tracing::{info, warn};
use crate::config::FailurePolicy;
use crate::countries::CountryTable;
use crate::error::{Error, Result};
use crate::extractors::{fetch_country, ProductSource};
use crate::models::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Other(String),
}

impl FailureReason {
    fn classify(err: &Error) -> Self {
        if err.is_timeout() {
            FailureReason::Timeout
        } else {
            FailureReason::Other(err.to_string())
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout => f.write_str("timeout"),
            FailureReason::Other(msg) => write!(f, "unknown error {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryOutcome {
    /// `rows` counts fetched rows before the zero-kcal filter.
    Fetched { country: String, rows: usize },
    Failed { country: String, reason: FailureReason },
}

#[derive(Debug, Default)]
pub struct GatherReport {
    pub dataset: Dataset,
    /// Codes of countries that failed, in table order.
    pub failed: Vec<String>,
    pub outcomes: Vec<CountryOutcome>,
}

/// Fetch every country of `table` in order and merge the results.
///
/// With [`FailurePolicy::Skip`] a failing country is logged, listed in
/// [`GatherReport::failed`] and contributes no rows. With
/// [`FailurePolicy::Abort`] the first failure ends the run.
pub async fn gather_all<S>(
    source: &S,
    fields: Option<&[String]>,
    table: &CountryTable,
    policy: FailurePolicy,
) -> Result<GatherReport>
where
    S: ProductSource + ?Sized,
{
    let mut report = GatherReport::default();

    for (index, country) in table.iter().enumerate() {
        info!(
            country = country.name,
            code = country.code,
            country_index = index + 1,
            countries_count = table.len(),
            "Getting products for country"
        );

        match fetch_country(source, &country.code, fields).await {
            Ok(rows) => {
                report.outcomes.push(CountryOutcome::Fetched {
                    country: country.code.clone(),
                    rows: rows.len(),
                });
                report.dataset.extend(rows);
            }
            Err(e) => {
                if policy == FailurePolicy::Abort {
                    return Err(Error::CountryFailed {
                        country: country.code.clone(),
                        source: Box::new(e),
                    });
                }

                let reason = FailureReason::classify(&e);
                warn!(
                    code = country.code,
                    reason = %reason,
                    "Failed for {} with {}",
                    country.code,
                    reason
                );
                report.failed.push(country.code.clone());
                report.outcomes.push(CountryOutcome::Failed {
                    country: country.code.clone(),
                    reason,
                });
            }
        }
    }

    report.dataset.retain_positive_kcal();

    if !report.failed.is_empty() {
        warn!(
            "Failed to fetch following countries {}",
            report.failed.join(",")
        );
    }

    info!(
        rows = report.dataset.len(),
        failed = report.failed.len(),
        "Finished gathering products"
    );

    Ok(report)
}
