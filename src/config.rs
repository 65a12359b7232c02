use serde::Deserialize;
use std::collections::HashMap;
use config::{Config, ConfigError};
use tracing::debug;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// JSON API base; `{locale}` is replaced by `world` or a country code.
    pub api_url_template: String,
    /// Legacy CGI search script; same placeholder rules as `api_url_template`.
    pub cgi_url_template: String,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url_template: "https://{locale}.openfoodfacts.org/api/v2".to_string(),
            cgi_url_template: "https://{locale}.openfoodfacts.org/cgi/search.pl".to_string(),
            user_agent: format!("off_etl/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CountryTableKind {
    #[default]
    World,
    Europe,
    Custom,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failing country, remember it and move on.
    #[default]
    Skip,
    /// Stop the whole run at the first failing country.
    Abort,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub fields: Vec<String>,
    pub country_table: CountryTableKind,
    pub countries: Vec<CountryEntry>,
    pub on_country_failure: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fields: ["code", "product_name", "nutriments", "countries_tags"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            country_table: CountryTableKind::default(),
            countries: Vec::new(),
            on_country_failure: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// A dataset at this path short-circuits fetching.
    pub existing_path: String,
    pub prefix: String,
    pub include_time: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            existing_path: "full_list.csv".to_string(),
            prefix: "off_full_list".to_string(),
            include_time: false,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("config/default")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        // Build the configuration
        let builder = Config::builder()
            .add_source(config::File::with_name(name).required(false))
            // Environment overrides, e.g. APP__OUTPUT__DIR
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            api_url_template = settings.api.api_url_template,
            country_table = ?settings.pipeline.country_table,
            on_country_failure = ?settings.pipeline.on_country_failure,
            "Loaded settings"
        );

        Ok(settings)
    }
}
