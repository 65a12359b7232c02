use crate::error::Result;
use crate::extractors::kcal::enrich;
use crate::models::{EnrichedProduct, Locale, Product};
use crate::services::api::ApiService;
use async_trait::async_trait;
use tracing::debug;

/// Anything that can list every product of a locale.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_all_products(&self, fields: Option<&[String]>, locale: &Locale) -> Result<Vec<Product>>;
}

#[async_trait]
impl ProductSource for ApiService {
    async fn fetch_all_products(&self, fields: Option<&[String]>, locale: &Locale) -> Result<Vec<Product>> {
        ApiService::fetch_all_products(self, fields, locale).await
    }
}

/// All products of one country with `kcal_per100` attached, in page order.
pub async fn fetch_country<S>(
    source: &S,
    country_code: &str,
    fields: Option<&[String]>,
) -> Result<Vec<EnrichedProduct>>
where
    S: ProductSource + ?Sized,
{
    let locale = Locale::from_code(Some(country_code));
    let products = source.fetch_all_products(fields, &locale).await?;

    debug!(
        country = country_code,
        products = products.len(),
        "Extracting kcal per 100g"
    );

    Ok(products
        .into_iter()
        .map(|p| enrich(p, locale.country_code()))
        .collect())
}
