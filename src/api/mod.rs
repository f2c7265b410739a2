//! Remote products API subsystem.
//!
//! # Data Flow
//! ```text
//! catalog service / generation
//!     → client.rs (build URL, send, status check)
//!     → types.rs (decode Product / acknowledgement)
//!     → ApiError on transport, decode, or status failure
//! ```
//!
//! | Operation | Method | Path            |
//! |-----------|--------|-----------------|
//! | List      | GET    | `/products`     |
//! | Get one   | GET    | `/products/{id}`|
//! | Create    | POST   | `/products`     |
//! | Delete    | DELETE | `/products/{id}`|

pub mod client;
pub mod types;

pub use client::ProductClient;
pub use types::{Acknowledgement, ApiError, ApiResult, NewProduct, Product, ProductId};
