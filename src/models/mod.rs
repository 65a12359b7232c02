mod dataset;
mod locale;
mod product;
mod response;

pub use dataset::Dataset;
pub use locale::{Endpoints, Locale};
pub use product::{EnrichedProduct, KcalValue, Nutriments, Product};
pub use response::{PageCountResponse, SearchResponse};
