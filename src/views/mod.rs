//! Page rendering.
//!
//! Templates live in `templates/` and are compiled into the binary. Each page
//! extends `layout.html`, the fixed-width shell with a toast slot.

pub mod format;

use std::sync::OnceLock;

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::api::Product;
use crate::catalog::{Draft, Toast};

pub use format::format_price;

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

/// A template failed to render.
#[derive(Debug, Error)]
#[error("failed to render {template}: {source}")]
pub struct ViewError {
    template: &'static str,
    #[source]
    source: minijinja::Error,
}

/// Source of an embedded template.
pub fn template_source(name: &str) -> Option<&'static str> {
    match name {
        "layout.html" => Some(include_str!("../../templates/layout.html")),
        "list.html" => Some(include_str!("../../templates/list.html")),
        "add_product.html" => Some(include_str!("../../templates/add_product.html")),
        "detail.html" => Some(include_str!("../../templates/detail.html")),
        "error.html" => Some(include_str!("../../templates/error.html")),
        _ => None,
    }
}

fn environment() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(|| {
        let mut env = Environment::new();
        env.set_loader(|name| Ok(template_source(name).map(str::to_owned)));
        env.add_filter("price", format_price);
        env
    })
}

fn render<S: Serialize>(template: &'static str, context: S) -> Result<String, ViewError> {
    environment()
        .get_template(template)
        .and_then(|t| t.render(context))
        .map_err(|source| ViewError { template, source })
}

/// The open add-product dialog.
#[derive(Debug, Serialize)]
pub struct DialogView<'a> {
    pub draft: &'a Draft,
    pub error: Option<String>,
    pub loading: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListView<'a> {
    pub products: &'a [Product],
    pub dialog: Option<DialogView<'a>>,
    pub toast: Option<Toast>,
}

#[derive(Debug, Serialize)]
pub struct DetailView<'a> {
    pub product: &'a Product,
}

#[derive(Debug, Serialize)]
pub struct ErrorView<'a> {
    pub status: u16,
    pub title: &'a str,
    pub message: &'a str,
}

pub fn render_list(view: &ListView<'_>) -> Result<String, ViewError> {
    render("list.html", view)
}

pub fn render_detail(view: &DetailView<'_>) -> Result<String, ViewError> {
    render("detail.html", view)
}

pub fn render_error(view: &ErrorView<'_>) -> Result<String, ViewError> {
    render("error.html", view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToastSequence;

    fn chair() -> Product {
        Product {
            id: 1,
            title: "Chair".into(),
            price: 50.0,
            img: "x".into(),
            description: "wooden".into(),
        }
    }

    #[test]
    fn test_list_renders_products_and_links() {
        let products = vec![chair()];
        let html = render_list(&ListView {
            products: &products,
            dialog: None,
            toast: None,
        })
        .unwrap();

        assert!(html.contains("All Product"));
        assert!(html.contains(r#"href="/product/1""#));
        assert!(html.contains(r#"src="x""#));
        assert!(html.contains("$50"));
        assert!(html.contains(r#"action="/product/1/delete""#));
        assert!(!html.contains("add-product-dialog"));
    }

    #[test]
    fn test_dialog_keeps_draft_values() {
        let draft = Draft {
            title: "Lamp".into(),
            price: "20".into(),
            img: "y".into(),
            description: "desk lamp".into(),
        };
        let html = render_list(&ListView {
            products: &[],
            dialog: Some(DialogView {
                draft: &draft,
                error: Some("price must not be negative".into()),
                loading: ToastSequence::CREATE.loading,
            }),
            toast: Some(ToastSequence::CREATE.settled(false)),
        })
        .unwrap();

        assert!(html.contains(r#"id="add-product-dialog""#));
        assert!(html.contains(r#"value="Lamp""#));
        assert!(html.contains("desk lamp</textarea>"));
        assert!(html.contains("price must not be negative"));
        assert!(html.contains("Could not save."));
        assert!(html.contains("Submitting..."));
    }

    #[test]
    fn test_detail_page() {
        let product = chair();
        let html = render_detail(&DetailView { product: &product }).unwrap();
        assert!(html.contains("Detail Product - Chair"));
        assert!(html.contains("wooden"));
        assert!(html.contains("Price $50"));
    }

    #[test]
    fn test_output_is_escaped() {
        let mut product = chair();
        product.title = "<b>Chair</b>".into();
        let html = render_detail(&DetailView { product: &product }).unwrap();
        assert!(!html.contains("<b>Chair</b>"));
        assert!(html.contains("&lt;b&gt;Chair&lt;"));
    }

    #[test]
    fn test_error_page() {
        let html = render_error(&ErrorView {
            status: 404,
            title: "Product not found",
            message: "No product with id 9.",
        })
        .unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("No product with id 9."));
    }
}
