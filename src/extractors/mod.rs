pub mod country;
pub mod kcal;

pub use country::{fetch_country, ProductSource};
pub use kcal::{enrich, extract_kcal};
