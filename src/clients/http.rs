use std::time::Duration;
use reqwest::{Client, RequestBuilder, Response};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde::de::DeserializeOwned;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        // Add configured headers
        for (key, value) in api.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = key,
                    header_value = value,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = key,
                    header_value = value,
                    "Invalid header value"
                );
            }
        }

        // Build the client
        let mut builder = Client::builder().user_agent(api.user_agent.clone());
        if let Some(secs) = api.request_timeout_secs {
            debug!(timeout_secs = secs, "Configuring request timeout");
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url);

        // Apply headers to each request
        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        request
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(classify)?;

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Response received"
        );

        // Map error statuses
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("Rate limit exceeded");
                Err(Error::RateLimit)
            },
            StatusCode::FORBIDDEN => {
                debug!(url = %response.url(), "Received 403 Forbidden");
                Err(Error::Forbidden)
            },
            status if !status.is_success() => Err(Error::Status(status)),
            _ => Ok(response)
        }
    }

    /// GET `url` with `query` appended and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url = url, query = ?query, "Sending request");

        let request = self.get(url).query(query);
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(classify)?;

        // Parse, logging the raw body on failure

        serde_json::from_slice(&body).map_err(|e| {
            let body_str = String::from_utf8_lossy(&body);
            error!(
                error = %e,
                url = url,
                body = %body_str,
                "Failed to parse response"
            );
            Error::from(e)
        })
    }
}

fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(err)
    }
}
