pub mod clients;
pub mod config;
pub mod countries;
pub mod error;
pub mod extractors;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use clients::HttpClient;
pub use countries::{Country, CountryTable};
pub use error::{Error, Result};
pub use extractors::{extract_kcal, fetch_country, ProductSource};
pub use models::{Dataset, EnrichedProduct, Endpoints, Locale, Nutriments, Product};
pub use pipeline::{run, PipelineOutcome};
pub use services::{gather_all, ApiService, CountryOutcome, FailureReason, GatherReport};
pub use storage::CsvStore;
