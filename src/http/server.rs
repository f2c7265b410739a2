//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all page and form handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, headers)
//! - Pre-render pages before accepting traffic
//! - Apply hot-reloaded generation settings
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api::ApiResult;
use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::http::handlers;
use crate::http::request::{self, MakeRequestUuidV4};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

/// HTTP server for the storefront.
pub struct HttpServer {
    router: Router,
    config: CatalogConfig,
    catalog: Arc<Catalog>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: CatalogConfig) -> ApiResult<Self> {
        let catalog = Arc::new(Catalog::from_config(&config)?);
        let state = AppState {
            catalog: catalog.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            catalog,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CatalogConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::list_page))
            .route("/products", post(handlers::create_product))
            .route("/product/{id}", get(handlers::detail_page))
            .route("/product/{id}/delete", post(handlers::delete_product))
            .route("/healthz", get(handlers::health))
            .with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("same-origin"),
                ));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|req: &Request<Body>| request::make_span(req)),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Pages are pre-rendered first. A failed pre-render is logged and pages are
    /// then generated on first request.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<CatalogConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        if let Err(e) = self.catalog.prerender().await {
            tracing::error!(
                error = %e,
                "Pre-rendering failed; pages will be generated on demand"
            );
        }

        let catalog = self.catalog.clone();
        let current = self.config.clone();
        tokio::spawn(async move {
            while let Some(update) = config_updates.recv().await {
                if update.listener.bind_address != current.listener.bind_address
                    || update.api.base_url != current.api.base_url
                {
                    tracing::warn!("Listener and API changes take effect after a restart");
                }
                catalog.update_settings(update.generation);
            }
        });

        tracing::info!(
            address = %addr,
            api = %self.catalog.client().base_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router with all layers, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
