//! Last-fetched product collection.
//!
//! The snapshot is immutable; a reload builds a new one and swaps it in whole.
//! Overlapping reloads each store on completion, so the response that resolves
//! last wins even if it was issued first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::api::{ApiResult, Product, ProductClient, ProductId};
use crate::observability::metrics;

/// Products in server response order, as of one list call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    products: Vec<Product>,
    fetched_at: Option<Instant>,
    generation: u64,
}

impl Snapshot {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// `None` until the first successful load.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// Completion order of the load that produced this snapshot, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.iter().map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Holder of the current snapshot plus the stale ("fetching") flag.
#[derive(Debug, Default)]
pub struct CollectionStore {
    current: ArcSwap<Snapshot>,
    stale: AtomicBool,
    completed: AtomicU64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// A mutation succeeded; the snapshot no longer reflects the server.
    pub fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Replace the whole collection and clear the stale flag.
    pub fn replace(&self, products: Vec<Product>) -> Arc<Snapshot> {
        let generation = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(Snapshot {
            products,
            fetched_at: Some(Instant::now()),
            generation,
        });
        self.current.store(snapshot.clone());
        self.stale.store(false, Ordering::SeqCst);

        metrics::record_catalog_size(snapshot.len());
        tracing::debug!(
            generation,
            products = snapshot.len(),
            "Product collection replaced"
        );
        snapshot
    }

    /// Fetch the list and replace the collection. On failure the old snapshot and
    /// the stale flag are left untouched.
    pub async fn reload(&self, client: &ProductClient) -> ApiResult<Arc<Snapshot>> {
        let products = client.list_products().await?;
        Ok(self.replace(products))
    }
}
