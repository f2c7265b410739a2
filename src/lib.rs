//! Product catalog storefront library

pub mod api;
pub mod catalog;
pub mod config;
pub mod generation;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod views;

pub use catalog::Catalog;
pub use config::schema::CatalogConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
