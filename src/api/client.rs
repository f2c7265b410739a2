//! Products API client.
//!
//! # Responsibilities
//! - Build request URLs from the configured base
//! - Issue the four catalog calls (list, get, create, delete)
//! - Separate transport failures from undecodable bodies
//! - Record latency and outcome of every call
//!
//! No retries: callers decide what a failure means.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::types::{Acknowledgement, ApiError, ApiResult, NewProduct, Product, ProductId};
use crate::config::ApiConfig;
use crate::observability::metrics;

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// HTTP client for the remote products resource.
#[derive(Clone)]
pub struct ProductClient {
    http: Client,
    base_url: Url,
}

impl ProductClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().map_err(|source| ApiError::Network {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self { http, base_url })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /products`
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        let url = self.endpoint("products")?;
        let start = Instant::now();
        let result = async {
            let response = self.send(self.http.get(url.clone()), &url).await?;
            let response = ensure_success(response, &url, None)?;
            decode(response, &url).await
        }
        .await;
        finish("list", start, &result);
        result
    }

    /// `GET /products/{id}`
    pub async fn get_product(&self, id: ProductId) -> ApiResult<Product> {
        let url = self.endpoint(&format!("products/{}", id))?;
        let start = Instant::now();
        let result = async {
            let response = self.send(self.http.get(url.clone()), &url).await?;
            let response = ensure_success(response, &url, Some(id))?;
            decode(response, &url).await
        }
        .await;
        finish("get", start, &result);
        result
    }

    /// `POST /products` with the product as JSON.
    pub async fn create_product(&self, product: &NewProduct) -> ApiResult<Acknowledgement> {
        let url = self.endpoint("products")?;
        let start = Instant::now();
        let result = async {
            let body = serde_json::to_vec(product).map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })?;
            let request = self
                .http
                .post(url.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))
                .body(body);
            let response = self.send(request, &url).await?;
            let response = ensure_success(response, &url, None)?;
            acknowledge(response, &url).await
        }
        .await;
        finish("create", start, &result);
        result
    }

    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, id: ProductId) -> ApiResult<Acknowledgement> {
        let url = self.endpoint(&format!("products/{}", id))?;
        let start = Instant::now();
        let result = async {
            let response = self.send(self.http.delete(url.clone()), &url).await?;
            let response = ensure_success(response, &url, Some(id))?;
            acknowledge(response, &url).await
        }
        .await;
        finish("delete", start, &result);
        result
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> ApiResult<Response> {
        tracing::debug!(url = %url, "Calling products API");
        request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for ProductClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Parse the base URL and make sure relative joins append to its path.
fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn ensure_success(response: Response, url: &Url, id: Option<ProductId>) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ApiError::NotFound(id)),
        _ => Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }),
    }
}

async fn read_body(response: Response, url: &Url) -> ApiResult<Vec<u8>> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> ApiResult<T> {
    let body = read_body(response, url).await?;
    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

async fn acknowledge(response: Response, url: &Url) -> ApiResult<Acknowledgement> {
    let body = read_body(response, url).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Acknowledgement(serde_json::Value::Null));
    }
    serde_json::from_slice(&body)
        .map(Acknowledgement)
        .map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
}

fn finish<T>(operation: &'static str, start: Instant, result: &ApiResult<T>) {
    match result {
        Ok(_) => {
            tracing::debug!(operation, elapsed = ?start.elapsed(), "Products API call succeeded");
            metrics::record_api_call(operation, "ok", start);
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "Products API call failed");
            metrics::record_api_call(operation, e.kind(), start);
        }
    }
}
