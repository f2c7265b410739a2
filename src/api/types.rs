//! Wire types and error definitions for the products API.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Server-assigned product identifier.
pub type ProductId = u64;

/// A product as returned by the API.
///
/// The list endpoint may omit `description`; it then decodes as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(deserialize_with = "lenient_price")]
    pub price: f64,
    pub img: String,
    #[serde(default)]
    pub description: String,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub img: String,
    pub description: String,
}

/// Whatever the server answered to a mutation. Only its arrival matters.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement(pub serde_json::Value);

/// Errors that can occur while talking to the products API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be received.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON for the expected type.
    #[error("response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server reports that the id does not exist.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Any other non-success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// The configured base URL cannot address the products resource.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network",
            ApiError::Decode { .. } => "decode",
            ApiError::NotFound(_) => "not_found",
            ApiError::Status { .. } => "status",
            ApiError::InvalidBaseUrl { .. } => "config",
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Accept `19.5` as well as `"19.5"`; records created through an HTML form carry strings.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("price '{}' is not a number", s))),
    }
}
