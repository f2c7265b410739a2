//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the storefront.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the storefront.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote products API.
    pub api: ApiConfig,

    /// Pre-rendering and revalidation of pages.
    pub generation: GenerationConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Remote products API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/products` resource hangs off.
    pub base_url: String,

    /// Connection establishment timeout in seconds. `None` keeps the transport default.
    pub connect_timeout_secs: Option<u64>,

    /// Total request timeout in seconds. `None` keeps the transport default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-products-server.herokuapp.com".to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }
}

/// What the detail route does with an id that was never pre-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Fetch and cache the page on first request.
    #[default]
    Blocking,
    /// Only ids known from the last list reload are served.
    NotFound,
}

/// Static generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Age in seconds after which the list snapshot is regenerated.
    pub list_revalidate_secs: u64,

    /// Age in seconds after which a detail page is regenerated.
    pub detail_revalidate_secs: u64,

    /// Unseen detail ids policy.
    pub fallback: Fallback,

    /// Detail pages fetched in parallel during pre-rendering.
    pub prerender_concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            list_revalidate_secs: 10,
            detail_revalidate_secs: 1,
            fallback: Fallback::Blocking,
            prerender_concurrency: 8,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024, // 64KB, forms only
        }
    }
}
