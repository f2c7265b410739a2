//! HTTP front-end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → handlers.rs (list, detail, add form, delete)
//!     → catalog (snapshot / generated pages / mutations)
//!     → views (HTML)
//!     → error.rs on failure
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::PageError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
