//! Per-document download accounting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cache::ExpiringCache;

/// Default counter window (1 hour).
const DEFAULT_TTL_SECS: u64 = 3600;

/// Expiring per-document download counters.
///
/// Counters live in their own store, in a namespace disjoint from share
/// tokens. A counter is created on the first download with a fresh TTL
/// window; subsequent increments do NOT renew the window, so a counter can
/// expire mid-window even while actively incremented. That matches the
/// accounting's display-only contract: counts reset via TTL expiry, never
/// via explicit decrement.
pub struct DownloadStats {
    counters: ExpiringCache<String, Arc<AtomicU64>>,
}

impl DownloadStats {
    /// Creates a stats store with the default 1-hour window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Creates a stats store with a custom counter window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            counters: ExpiringCache::new(ttl),
        }
    }

    /// Records one successful download, returning the new count.
    ///
    /// The read-modify-write is atomic: concurrent calls for the same
    /// document never lose updates.
    pub fn record(&self, document_id: &str) -> u64 {
        let counter = self
            .counters
            .get_or_insert_with(document_id.to_string(), || Arc::new(AtomicU64::new(0)));
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current count for a document; 0 when absent or expired.
    #[must_use]
    pub fn count(&self, document_id: &str) -> u64 {
        self.counters
            .get(document_id)
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }
}

impl Default for DownloadStats {
    fn default() -> Self {
        Self::new()
    }
}
