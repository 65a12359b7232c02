use std::sync::Arc;
use tracing::{debug, info};
use crate::clients::HttpClient;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{Endpoints, Locale, PageCountResponse, Product, SearchResponse};

/// Client for the Open Food Facts search APIs.
///
/// Holds no locale of its own: every call names the [`Locale`] it targets,
/// so one instance can serve any sequence of countries.
#[derive(Clone)]
pub struct ApiService {
    client: Arc<HttpClient>,
    api: ApiConfig,
}

impl ApiService {
    pub fn new(api: ApiConfig) -> Result<Self> {
        let client = HttpClient::new(&api)?;
        Ok(Self { client: Arc::new(client), api })
    }

    pub fn endpoints(&self, locale: &Locale) -> Endpoints {
        Endpoints::for_locale(&self.api, locale)
    }

    /// Look up one or more barcodes in a single request.
    pub async fn fetch_product_by_code(
        &self,
        codes: &[&str],
        fields: Option<&[String]>,
        locale: &Locale,
    ) -> Result<Vec<Product>> {
        let url = self.endpoints(locale).search();
        let mut query = vec![("code", codes.join(","))];
        push_fields(&mut query, fields);

        let response: SearchResponse = self.client.get_json(&url, &query).await?;
        debug!(
            codes = codes.len(),
            returned = response.products.len(),
            locale = %locale,
            "Fetched products by code"
        );
        Ok(response.products)
    }

    pub async fn page_count(&self, url: &str, query: &[(&str, String)]) -> Result<u32> {
        let response: PageCountResponse = self.client.get_json(url, query).await?;
        Ok(response.page_count)
    }

    /// Every product of the locale, one sequential request per page.
    pub async fn fetch_all_products(
        &self,
        fields: Option<&[String]>,
        locale: &Locale,
    ) -> Result<Vec<Product>> {
        let url = self.endpoints(locale).search();

        // Get page count first
        let page_count = self
            .page_count(&url, &[("fields", "page_count".to_string())])
            .await?;

        info!(locale = %locale, page_count = page_count, "Fetching all products");

        let mut base_query = Vec::new();
        push_fields(&mut base_query, fields);

        // Fetch each page in order
        self.fetch_pages(&url, &base_query, page_count, locale).await
    }

    /// Products of one category through the legacy CGI search.
    pub async fn fetch_products_by_category(
        &self,
        category: &str,
        fields: Option<&[String]>,
        locale: &Locale,
    ) -> Result<Vec<Product>> {
        let url = self.endpoints(locale).cgi_search;
        let mut base_query = vec![
            ("action", "process".to_string()),
            ("tagtype_0", "categories".to_string()),
            ("tag_contains_0", "contains".to_string()),
            ("tag_0", category.to_string()),
        ];
        push_fields(&mut base_query, fields);
        // CGI search answers HTML unless asked for JSON
        base_query.push(("json", "true".to_string()));

        let page_count = self.page_count(&url, &base_query).await?;

        info!(
            locale = %locale,
            category = category,
            page_count = page_count,
            "Fetching products by category"
        );

        self.fetch_pages(&url, &base_query, page_count, locale).await
    }

    async fn fetch_pages(
        &self,
        url: &str,
        base_query: &[(&str, String)],
        page_count: u32,
        locale: &Locale,
    ) -> Result<Vec<Product>> {
        let mut products = Vec::new();

        // Pages are 1-based
        for page in 1..=page_count {
            let mut query = base_query.to_vec();
            query.push(("page", page.to_string()));

            let response: SearchResponse = self.client.get_json(url, &query).await?;
            debug!(
                locale = %locale,
                page = page,
                page_count = page_count,
                products = response.products.len(),
                "Fetched page"
            );
            products.extend(response.products);
        }

        Ok(products)
    }
}

fn push_fields<'a>(query: &mut Vec<(&'a str, String)>, fields: Option<&[String]>) {
    if let Some(fields) = fields.filter(|f| !f.is_empty()) {
        query.push(("fields", fields.join(",")));
    }
}
