//! Catalog service: the list snapshot, detail pages, and mutation commands.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::api::{ApiResult, ProductClient, ProductId};
use crate::catalog::mutation::{Mutation, MutationOutcome};
use crate::catalog::snapshot::Snapshot;
use crate::config::{CatalogConfig, GenerationConfig};
use crate::generation::{DetailOutcome, DetailPages, ListPage, PageSource, PrerenderReport};

/// Shared entry point for pages and mutations.
pub struct Catalog {
    client: Arc<ProductClient>,
    list: ListPage,
    details: DetailPages,
    settings: ArcSwap<GenerationConfig>,
}

impl Catalog {
    pub fn new(client: ProductClient, settings: GenerationConfig) -> Self {
        Self {
            client: Arc::new(client),
            list: ListPage::new(),
            details: DetailPages::new(),
            settings: ArcSwap::from_pointee(settings),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> ApiResult<Self> {
        let client = ProductClient::new(&config.api)?;
        Ok(Self::new(client, config.generation.clone()))
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    pub fn settings(&self) -> Arc<GenerationConfig> {
        self.settings.load_full()
    }

    /// Swap in new generation settings; takes effect on the next request.
    pub fn update_settings(&self, settings: GenerationConfig) {
        tracing::info!(
            list_revalidate_secs = settings.list_revalidate_secs,
            detail_revalidate_secs = settings.detail_revalidate_secs,
            fallback = ?settings.fallback,
            "Generation settings updated"
        );
        self.settings.store(Arc::new(settings));
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.list.store().snapshot()
    }

    pub fn is_stale(&self) -> bool {
        self.list.store().is_stale()
    }

    pub fn detail_pages(&self) -> &DetailPages {
        &self.details
    }

    /// Load the list, then every detail page it names.
    pub async fn prerender(&self) -> ApiResult<PrerenderReport> {
        let snapshot = self.reload().await?;
        let concurrency = self.settings().prerender_concurrency;
        let report = self
            .details
            .prerender(&self.client, snapshot.ids().collect(), concurrency)
            .await;
        tracing::info!(
            products = snapshot.len(),
            rendered = report.rendered,
            missing = report.missing,
            failed = report.failed,
            "Pre-rendering complete"
        );
        Ok(report)
    }

    /// Force a list reload.
    pub async fn reload(&self) -> ApiResult<Arc<Snapshot>> {
        self.list.store().reload(&self.client).await
    }

    pub async fn list_page(&self) -> ApiResult<(Arc<Snapshot>, PageSource)> {
        let window = Duration::from_secs(self.settings().list_revalidate_secs);
        self.list.resolve(&self.client, window).await
    }

    pub async fn detail_page(&self, id: ProductId) -> ApiResult<DetailOutcome> {
        let settings = self.settings();
        let known = self.snapshot().contains(id);
        self.details
            .resolve(
                &self.client,
                id,
                Duration::from_secs(settings.detail_revalidate_secs),
                settings.fallback,
                known,
            )
            .await
    }

    /// Execute one mutation, wait for it to settle, then reload explicitly.
    ///
    /// The stale flag is raised as soon as the API acknowledges the mutation; the
    /// reload clears it. If the reload fails the flag stays up and the next list
    /// request reloads before rendering.
    pub async fn apply(&self, mutation: Mutation) -> MutationOutcome {
        let toasts = mutation.toasts();
        tracing::info!(mutation = mutation.label(), status = toasts.loading, "Mutation started");

        let result = match &mutation {
            Mutation::Create(product) => self.client.create_product(product).await,
            Mutation::Delete(id) => self.client.delete_product(*id).await,
        };

        if let Err(e) = &result {
            tracing::warn!(
                mutation = mutation.label(),
                error = %e,
                status = toasts.error,
                "Mutation failed"
            );
            return MutationOutcome {
                toasts,
                result,
                reload: None,
            };
        }

        self.list.store().mark_stale();
        if let Mutation::Delete(id) = &mutation {
            self.details.evict(*id);
        }

        let reload = self.reload().await;
        match &reload {
            Ok(snapshot) => tracing::info!(
                mutation = mutation.label(),
                generation = snapshot.generation(),
                status = toasts.success,
                "Mutation applied, collection reloaded"
            ),
            Err(e) => tracing::warn!(
                mutation = mutation.label(),
                error = %e,
                "Mutation applied but reload failed; collection left stale"
            ),
        }

        MutationOutcome {
            toasts,
            result,
            reload: Some(reload),
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("client", &self.client)
            .field("products", &self.snapshot().len())
            .field("detail_pages", &self.details.len())
            .finish()
    }
}
