#![allow(dead_code)]

use off_etl::config::ApiConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API settings that route `{locale}` to a path prefix on the mock server.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        api_url_template: format!("{}/{{locale}}/api/v2", server.uri()),
        cgi_url_template: format!("{}/{{locale}}/cgi/search.pl", server.uri()),
        ..ApiConfig::default()
    }
}

pub fn product(code: &str, kcal: Option<f64>) -> Value {
    let nutriments = match kcal {
        Some(v) => json!({"energy-kcal": v, "fat": 1.0}),
        None => json!({"fat": 1.0}),
    };
    json!({
        "code": code,
        "product_name": format!("Product {}", code),
        "nutriments": nutriments,
        "countries_tags": ["en:germany"],
    })
}

/// Mount the `page_count` lookup plus one response per page for `locale`.
pub async fn mount_search_pages(server: &MockServer, locale: &str, pages: Vec<Vec<Value>>) {
    let search = format!("/{}/api/v2/search", locale);

    Mock::given(method("GET"))
        .and(path(search.clone()))
        .and(query_param("fields", "page_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": pages.iter().map(Vec::len).sum::<usize>(),
            "page_count": pages.len(),
        })))
        .expect(1)
        .mount(server)
        .await;

    for (i, products) in pages.into_iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(search.clone()))
            .and(query_param("page", (i + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": i + 1,
                "products": products,
            })))
            .expect(1)
            .mount(server)
            .await;
    }
}
