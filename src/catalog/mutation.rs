//! Mutation commands and their results.

use std::sync::Arc;

use crate::api::{Acknowledgement, ApiResult, NewProduct, ProductId};
use crate::catalog::snapshot::Snapshot;
use crate::catalog::toast::{Toast, ToastSequence};

/// A change requested of the products API.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(NewProduct),
    Delete(ProductId),
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Delete(_) => "delete",
        }
    }

    pub fn toasts(&self) -> ToastSequence {
        match self {
            Mutation::Create(_) => ToastSequence::CREATE,
            Mutation::Delete(_) => ToastSequence::DELETE,
        }
    }
}

/// What happened to one mutation command.
///
/// `reload` is only present when the mutation succeeded; a failed mutation never
/// reloads the collection.
#[derive(Debug)]
pub struct MutationOutcome {
    pub toasts: ToastSequence,
    pub result: ApiResult<Acknowledgement>,
    pub reload: Option<ApiResult<Arc<Snapshot>>>,
}

impl MutationOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn toast(&self) -> Toast {
        self.toasts.settled(self.succeeded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::catalog::toast::ToastLevel;

    #[test]
    fn test_failed_outcome() {
        let outcome = MutationOutcome {
            toasts: Mutation::Delete(3).toasts(),
            result: Err(ApiError::NotFound(3)),
            reload: None,
        };
        assert!(!outcome.succeeded());
        assert_eq!(outcome.toast().message, "Could not delete.");
        assert!(matches!(outcome.result, Err(ApiError::NotFound(3))));
        assert!(outcome.reload.is_none());
    }

    #[test]
    fn test_success_without_reload_data() {
        let outcome = MutationOutcome {
            toasts: ToastSequence::CREATE,
            result: Ok(Acknowledgement(serde_json::Value::Null)),
            reload: Some(Err(ApiError::Status {
                url: "http://api/products".into(),
                status: 503,
            })),
        };
        assert!(outcome.succeeded());
        assert_eq!(outcome.toast().level, ToastLevel::Success);
        assert!(matches!(outcome.reload, Some(Err(ApiError::Status { status: 503, .. }))));
    }
}
