//! Generation of the product list page data.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiResult, ProductClient};
use crate::catalog::snapshot::{CollectionStore, Snapshot};
use crate::generation::{Freshness, InFlight, PageSource};

/// The list page's collection and its revalidation state.
#[derive(Debug, Default)]
pub struct ListPage {
    store: Arc<CollectionStore>,
    regenerating: InFlight,
}

impl ListPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &Arc<CollectionStore> {
        &self.store
    }

    /// Snapshot to render for one request.
    ///
    /// A missing or stale-flagged collection is reloaded before returning. If that
    /// reload fails and an older snapshot exists, the older one is served.
    pub async fn resolve(
        &self,
        client: &Arc<ProductClient>,
        window: Duration,
    ) -> ApiResult<(Arc<Snapshot>, PageSource)> {
        let snapshot = self.store.snapshot();

        if !snapshot.is_loaded() || self.store.is_stale() {
            return match self.store.reload(client).await {
                Ok(fresh) => Ok((fresh, PageSource::Generated)),
                Err(e) if snapshot.is_loaded() => {
                    tracing::warn!(error = %e, "List reload failed, serving previous snapshot");
                    Ok((snapshot, PageSource::Stale))
                }
                Err(e) => Err(e),
            };
        }

        match Freshness::of(snapshot.fetched_at(), window) {
            Freshness::Expired => {
                self.spawn_regeneration(client.clone());
                Ok((snapshot, PageSource::Stale))
            }
            _ => Ok((snapshot, PageSource::Fresh)),
        }
    }

    /// Start a background reload unless one is already running.
    pub fn spawn_regeneration(&self, client: Arc<ProductClient>) -> bool {
        let Some(guard) = self.regenerating.try_begin() else {
            return false;
        };
        let store = self.store.clone();
        tokio::spawn(async move {
            let _guard = guard;
            match store.reload(&client).await {
                Ok(snapshot) => tracing::debug!(
                    generation = snapshot.generation(),
                    "List page regenerated"
                ),
                Err(e) => tracing::warn!(error = %e, "List page regeneration failed"),
            }
        });
        true
    }
}
