pub mod aggregator;
pub mod api;

pub use aggregator::{gather_all, CountryOutcome, FailureReason, GatherReport};
pub use api::ApiService;
