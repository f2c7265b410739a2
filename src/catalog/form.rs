//! Add-product form state machine.
//!
//! ```text
//!            open()                 edit(name, value)
//!  Closed ──────────▶ Open(draft) ◀──────────────────┐
//!    ▲                 │  │  └─────────────────────────┘
//!    │     cancel()    │  │ submit() → NewProduct, stays Open
//!    └─────────────────┘  │
//!    ▲                    ▼
//!    └──── settle(true) ─ awaiting result; settle(false) keeps Open
//! ```

use thiserror::Error;

use crate::api::NewProduct;
use crate::catalog::draft::{Draft, DraftError, DraftField};

/// Errors raised by form transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("the add-product form is closed")]
    Closed,

    #[error("unknown form field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Invalid(#[from] DraftError),
}

/// Current state of the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    Open(Draft),
}

/// Controller for the add-product dialog.
#[derive(Debug, Clone, Default)]
pub struct AddProductForm {
    state: FormState,
}

impl AddProductForm {
    /// A closed form.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form already opened with an empty draft.
    pub fn opened() -> Self {
        let mut form = Self::new();
        form.open();
        form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open(_))
    }

    /// Draft being edited, if the dialog is open.
    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            FormState::Open(draft) => Some(draft),
            FormState::Closed => None,
        }
    }

    /// Closed → Open with an empty draft. Opening an open form keeps its draft.
    pub fn open(&mut self) {
        if let FormState::Closed = self.state {
            self.state = FormState::Open(Draft::default());
        }
    }

    /// Write one named field into the draft.
    pub fn edit(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let FormState::Open(draft) = &mut self.state else {
            return Err(FormError::Closed);
        };
        let field: DraftField = name.parse().map_err(FormError::UnknownField)?;
        draft.set(field, value);
        Ok(())
    }

    /// Discard the draft without any network call.
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }

    /// Validate the draft for sending. The form stays open until [`settle`](Self::settle).
    pub fn submit(&self) -> Result<NewProduct, FormError> {
        match &self.state {
            FormState::Open(draft) => Ok(draft.validate()?),
            FormState::Closed => Err(FormError::Closed),
        }
    }

    /// Apply the result of the create request.
    ///
    /// Success closes the dialog and discards the draft; failure leaves it open as it was.
    pub fn settle(&mut self, succeeded: bool) {
        if succeeded {
            self.state = FormState::Closed;
        }
    }
}
