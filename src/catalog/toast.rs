//! User-visible notifications for mutations.

use serde::Serialize;

/// Severity of a toast, also its CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: &'static str,
}

/// Loading, success, and error messages for one kind of mutation.
#[derive(Debug, Clone, Copy)]
pub struct ToastSequence {
    pub loading: &'static str,
    pub success: &'static str,
    pub error: &'static str,
}

impl ToastSequence {
    pub const CREATE: ToastSequence = ToastSequence {
        loading: "Submitting...",
        success: "Product successfully submitted !",
        error: "Could not save.",
    };

    pub const DELETE: ToastSequence = ToastSequence {
        loading: "Deleting...",
        success: "Product successfully deleted !",
        error: "Could not delete.",
    };

    pub fn loading(&self) -> Toast {
        Toast {
            level: ToastLevel::Loading,
            message: self.loading,
        }
    }

    /// Toast for a settled request.
    pub fn settled(&self, succeeded: bool) -> Toast {
        if succeeded {
            Toast {
                level: ToastLevel::Success,
                message: self.success,
            }
        } else {
            Toast {
                level: ToastLevel::Error,
                message: self.error,
            }
        }
    }
}

/// A toast carried across a redirect in the `toast` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Created,
    Deleted,
    DeleteFailed,
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::Created => "created",
            Flash::Deleted => "deleted",
            Flash::DeleteFailed => "delete-failed",
        }
    }

    /// Unknown codes are ignored rather than rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Flash::Created),
            "deleted" => Some(Flash::Deleted),
            "delete-failed" => Some(Flash::DeleteFailed),
            _ => None,
        }
    }

    pub fn toast(self) -> Toast {
        match self {
            Flash::Created => ToastSequence::CREATE.settled(true),
            Flash::Deleted => ToastSequence::DELETE.settled(true),
            Flash::DeleteFailed => ToastSequence::DELETE.settled(false),
        }
    }
}
