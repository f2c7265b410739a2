//! Page and form handlers.

use axum::{
    extract::{rejection::QueryRejection, Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ProductId;
use crate::catalog::{AddProductForm, Flash, Mutation, Toast, ToastSequence};
use crate::generation::DetailOutcome;
use crate::http::error::PageError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::views::{self, DetailView, DialogView, ListView};

/// Query string of the list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `add` opens the add-product dialog.
    pub dialog: Option<String>,
    /// Flash code left by a redirect.
    pub toast: Option<String>,
}

/// `GET /`
pub async fn list_page(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Html<String>, PageError> {
    let Query(query) = query.map_err(|e| PageError::BadRequest(e.body_text()))?;
    let (snapshot, source) = state.catalog.list_page().await?;
    metrics::record_page_render("list", source.as_str());

    let mut form = AddProductForm::new();
    if query.dialog.as_deref() == Some("add") {
        form.open();
    }
    let toast = query
        .toast
        .as_deref()
        .and_then(Flash::from_code)
        .map(Flash::toast);

    let html = views::render_list(&ListView {
        products: snapshot.products(),
        dialog: form.draft().map(|draft| DialogView {
            draft,
            error: None,
            loading: ToastSequence::CREATE.loading,
        }),
        toast,
    })?;
    Ok(Html(html))
}

/// `POST /products`
///
/// Fields are applied to the draft in the order they were posted. The dialog only
/// closes once the create request settled successfully.
pub async fn create_product(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, PageError> {
    let mut form = AddProductForm::opened();
    for (name, value) in &fields {
        if let Err(e) = form.edit(name, value) {
            tracing::debug!(error = %e, "Ignoring posted field");
        }
    }

    let product = match form.submit() {
        Ok(product) => product,
        Err(e) => {
            tracing::info!(error = %e, "Add-product form rejected");
            return render_open_dialog(
                &state,
                &form,
                Some(e.to_string()),
                None,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    let outcome = state.catalog.apply(Mutation::Create(product)).await;
    form.settle(outcome.succeeded());

    if form.is_open() {
        return render_open_dialog(
            &state,
            &form,
            None,
            Some(outcome.toast()),
            StatusCode::BAD_GATEWAY,
        );
    }
    Ok(Redirect::to(&flash_location(Flash::Created)).into_response())
}

/// `POST /product/{id}/delete`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, PageError> {
    let Ok(id) = raw_id.parse::<ProductId>() else {
        return Err(PageError::NotFound(raw_id));
    };

    let outcome = state.catalog.apply(Mutation::Delete(id)).await;
    let flash = if outcome.succeeded() {
        Flash::Deleted
    } else {
        Flash::DeleteFailed
    };
    Ok(Redirect::to(&flash_location(flash)))
}

/// `GET /product/{id}`
pub async fn detail_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let Ok(id) = raw_id.parse::<ProductId>() else {
        return Err(PageError::NotFound(raw_id));
    };

    match state.catalog.detail_page(id).await? {
        DetailOutcome::Page(product, source) => {
            metrics::record_page_render("detail", source.as_str());
            let html = views::render_detail(&DetailView { product: &product })?;
            Ok(Html(html))
        }
        DetailOutcome::NotFound => Err(PageError::NotFound(raw_id)),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub version: String,
    pub status: String,
    pub loaded: bool,
    pub stale: bool,
    pub products: usize,
    pub detail_pages: usize,
}

/// `GET /healthz`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let snapshot = state.catalog.snapshot();
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        loaded: snapshot.is_loaded(),
        stale: state.catalog.is_stale(),
        products: snapshot.len(),
        detail_pages: state.catalog.detail_pages().len(),
    })
}

fn flash_location(flash: Flash) -> String {
    format!("/?toast={}", flash.code())
}

/// Render the list from the current snapshot, without reloading, with the dialog open.
fn render_open_dialog(
    state: &AppState,
    form: &AddProductForm,
    error: Option<String>,
    toast: Option<Toast>,
    status: StatusCode,
) -> Result<Response, PageError> {
    let snapshot = state.catalog.snapshot();
    let html = views::render_list(&ListView {
        products: snapshot.products(),
        dialog: form.draft().map(|draft| DialogView {
            draft,
            error,
            loading: ToastSequence::CREATE.loading,
        }),
        toast,
    })?;
    Ok((status, Html(html)).into_response())
}
