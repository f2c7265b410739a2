//! Mapping of page failures to HTML error responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::api::ApiError;
use crate::views::{self, ErrorView, ViewError};

/// Failure while serving a page.
#[derive(Debug, Error)]
pub enum PageError {
    /// The route names no product.
    #[error("no product at '{0}'")]
    NotFound(String),

    /// The query string could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] ApiError),

    #[error(transparent)]
    Render(#[from] ViewError),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) | PageError::Upstream(ApiError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PageError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match status {
            StatusCode::NOT_FOUND => (
                "Product not found",
                "The product you are looking for does not exist.",
            ),
            StatusCode::BAD_REQUEST => (
                "Bad request",
                "The address of this page is not valid.",
            ),
            StatusCode::BAD_GATEWAY => (
                "Catalog unavailable",
                "The product catalog could not be reached. Please try again.",
            ),
            _ => ("Something went wrong", "The page could not be rendered."),
        };

        match &self {
            PageError::NotFound(_) | PageError::BadRequest(_) => {
                tracing::debug!(error = %self, "Page request rejected")
            }
            PageError::Upstream(e) => tracing::warn!(error = %e, "Page failed upstream"),
            PageError::Render(e) => tracing::error!(error = %e, "Page failed to render"),
        }

        match views::render_error(&ErrorView {
            status: status.as_u16(),
            title,
            message,
        }) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Error page failed to render");
                (status, title).into_response()
            }
        }
    }
}
