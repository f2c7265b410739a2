//! Generation of product detail pages.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::{DashMap, DashSet};
use futures_util::stream::{self, StreamExt};

use crate::api::{ApiError, ApiResult, Product, ProductClient, ProductId};
use crate::config::Fallback;
use crate::generation::{Freshness, PageSource};

#[derive(Debug, Clone)]
struct GeneratedPage {
    product: Arc<Product>,
    generated_at: Instant,
}

/// Result of resolving a detail route.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Page(Arc<Product>, PageSource),
    NotFound,
}

/// Counts from a pre-rendering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrerenderReport {
    pub rendered: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Cache of generated detail pages keyed by product id.
#[derive(Debug, Default)]
pub struct DetailPages {
    pages: Arc<DashMap<ProductId, GeneratedPage>>,
    in_flight: Arc<DashSet<ProductId>>,
}

impl DetailPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.pages.contains_key(&id)
    }

    pub fn store(&self, product: Product) -> Arc<Product> {
        let product = Arc::new(product);
        self.pages.insert(
            product.id,
            GeneratedPage {
                product: product.clone(),
                generated_at: Instant::now(),
            },
        );
        product
    }

    pub fn evict(&self, id: ProductId) {
        if self.pages.remove(&id).is_some() {
            tracing::debug!(id, "Detail page evicted");
        }
    }

    /// Fetch and cache every id, `concurrency` requests at a time.
    pub async fn prerender(
        &self,
        client: &ProductClient,
        ids: Vec<ProductId>,
        concurrency: usize,
    ) -> PrerenderReport {
        let mut report = PrerenderReport::default();
        let mut results = stream::iter(ids)
            .map(|id| async move { (id, client.get_product(id).await) })
            .buffer_unordered(concurrency.max(1));

        while let Some((id, result)) = results.next().await {
            match result {
                Ok(product) => {
                    self.store(product);
                    report.rendered += 1;
                }
                Err(ApiError::NotFound(_)) => report.missing += 1,
                Err(e) => {
                    tracing::warn!(id, error = %e, "Pre-rendering detail page failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Page to render for `/product/{id}`.
    ///
    /// `known` tells whether the id appears in the current list snapshot; it only
    /// matters for an uncached id under [`Fallback::NotFound`].
    pub async fn resolve(
        &self,
        client: &Arc<ProductClient>,
        id: ProductId,
        window: Duration,
        fallback: Fallback,
        known: bool,
    ) -> ApiResult<DetailOutcome> {
        let cached = self.pages.get(&id).map(|entry| entry.value().clone());

        if let Some(page) = cached {
            return Ok(match Freshness::of(Some(page.generated_at), window) {
                Freshness::Expired => {
                    self.spawn_regeneration(client.clone(), id);
                    DetailOutcome::Page(page.product, PageSource::Stale)
                }
                _ => DetailOutcome::Page(page.product, PageSource::Fresh),
            });
        }

        if fallback == Fallback::NotFound && !known {
            return Ok(DetailOutcome::NotFound);
        }

        match client.get_product(id).await {
            Ok(product) => Ok(DetailOutcome::Page(self.store(product), PageSource::Generated)),
            Err(ApiError::NotFound(_)) => Ok(DetailOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Refetch one page in the background unless that id is already being refetched.
    fn spawn_regeneration(&self, client: Arc<ProductClient>, id: ProductId) -> bool {
        if !self.in_flight.insert(id) {
            return false;
        }
        let in_flight = self.in_flight.clone();
        let pages = self.pages.clone();
        tokio::spawn(async move {
            match client.get_product(id).await {
                // An entry evicted while the fetch ran stays evicted.
                Ok(product) => match pages.get_mut(&id) {
                    Some(mut entry) => {
                        *entry = GeneratedPage {
                            product: Arc::new(product),
                            generated_at: Instant::now(),
                        };
                        tracing::debug!(id, "Detail page regenerated");
                    }
                    None => tracing::debug!(id, "Detail page evicted during regeneration"),
                },
                Err(ApiError::NotFound(_)) => {
                    pages.remove(&id);
                    tracing::info!(id, "Product gone, detail page evicted");
                }
                Err(e) => tracing::warn!(id, error = %e, "Detail page regeneration failed"),
            }
            in_flight.remove(&id);
        });
        true
    }
}
