use thiserror::Error;
use http::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status code: {0}")]
    Status(StatusCode),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Forbidden - Access denied")]
    Forbidden,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Fetching country {country} failed: {source}")]
    CountryFailed {
        country: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Country table '{0}' is empty or unknown")]
    UnknownCountryTable(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
