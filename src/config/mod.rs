//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CatalogConfig (validated, immutable)
//!     → handed to HttpServer at startup
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the live GenerationConfig
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only generation settings are hot-swapped
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::ApiConfig;
pub use schema::CatalogConfig;
pub use schema::Fallback;
pub use schema::GenerationConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
