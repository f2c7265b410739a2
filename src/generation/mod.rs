//! Static generation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     list_products() → list snapshot → get_product(id) for each id → detail pages
//!
//! Request:
//!     fresh page        → served as is
//!     expired page      → served stale, one background regeneration
//!     missing page      → generated while the request waits (blocking fallback)
//! ```
//!
//! # Design Decisions
//! - Page data is generated ahead of time, HTML is rendered per request
//! - At most one regeneration per page is in flight
//! - A failed regeneration keeps serving the last good page

pub mod detail;
pub mod list;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use detail::{DetailOutcome, DetailPages, PrerenderReport};
pub use list::ListPage;

/// Age of generated data relative to its revalidation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Fresh,
    Expired,
}

impl Freshness {
    pub fn of(generated_at: Option<Instant>, window: Duration) -> Self {
        match generated_at {
            None => Freshness::Missing,
            Some(at) if at.elapsed() >= window => Freshness::Expired,
            Some(_) => Freshness::Fresh,
        }
    }
}

/// Where the data behind a served page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Within its revalidation window.
    Fresh,
    /// Past its window; a regeneration was started or the last one failed.
    Stale,
    /// Fetched while the request waited.
    Generated,
}

impl PageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PageSource::Fresh => "fresh",
            PageSource::Stale => "stale",
            PageSource::Generated => "generated",
        }
    }
}

/// Single in-flight flag for a background regeneration.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    /// Claim the flag; `None` if a regeneration is already running.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(self.0.clone()))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the in-flight flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness() {
        let window = Duration::from_secs(10);
        assert_eq!(Freshness::of(None, window), Freshness::Missing);
        assert_eq!(Freshness::of(Some(Instant::now()), window), Freshness::Fresh);

        let old = Instant::now() - Duration::from_secs(11);
        assert_eq!(Freshness::of(Some(old), window), Freshness::Expired);
    }

    #[test]
    fn test_in_flight_is_exclusive() {
        let flag = InFlight::default();
        let guard = flag.try_begin().expect("first claim succeeds");
        assert!(flag.is_running());
        assert!(flag.try_begin().is_none());

        drop(guard);
        assert!(!flag.is_running());
        assert!(flag.try_begin().is_some());
    }
}
