//! Client-side catalog state.
//!
//! # Data Flow
//! ```text
//! list snapshot (immutable, last fetched)      add-product draft (per request)
//!     ▲                                             │
//!     │ reload()                                    │ submit()
//!     │                                             ▼
//! service.rs ◀──── Mutation::{Create, Delete} ── form.rs
//!     │
//!     └──▶ MutationOutcome (toast, ack, reload result)
//! ```
//!
//! # Design Decisions
//! - Two explicit state slices: snapshot and draft never share storage
//! - A mutation is awaited, then the reload is invoked explicitly
//! - A failed mutation keeps the dialog open and never reloads

pub mod draft;
pub mod form;
pub mod mutation;
pub mod service;
pub mod snapshot;
pub mod toast;

pub use draft::{Draft, DraftError, DraftField};
pub use form::{AddProductForm, FormError, FormState};
pub use mutation::{Mutation, MutationOutcome};
pub use service::Catalog;
pub use snapshot::{CollectionStore, Snapshot};
pub use toast::{Flash, Toast, ToastLevel, ToastSequence};
