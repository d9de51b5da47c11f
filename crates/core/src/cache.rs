//! Ephemeral expiring key-value store built on Moka.
//!
//! The sole shared mutable state in the broker. Share tokens and download
//! counters each own an independent instance, so their key namespaces and
//! eviction policies never mix.

use std::hash::Hash;
use std::time::Duration;

use moka::sync::Cache;

/// Default time-to-live for entries (1 hour).
const DEFAULT_TTL_SECS: u64 = 3600;

/// Default capacity (number of entries).
const DEFAULT_CAPACITY: u64 = 10_000;

/// In-memory mapping with per-entry expiration.
///
/// Entries expire a fixed TTL after creation; updates through the returned
/// value (e.g. an atomic counter) do not renew the TTL. A `get` after expiry
/// behaves as absent. Thread-safe and suitable for concurrent access; no
/// persistence across process restarts.
#[derive(Clone)]
pub struct ExpiringCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<K, V>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a store with the given entry TTL and default capacity.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// Creates a store with the given entry TTL and capacity bound.
    #[must_use]
    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Inserts a value, starting a fresh TTL window for the key.
    pub fn insert(&self, key: K, value: V) {
        self.cache.insert(key, value);
    }

    /// Returns the value for `key`, or `None` when absent or expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.get(key)
    }

    /// Returns the value for `key`, inserting one from `init` when absent.
    ///
    /// The initializer runs at most once per key under contention; concurrent
    /// callers for the same key all receive the single inserted value. The
    /// TTL window starts at insertion.
    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> V
    where
        K: Clone,
    {
        self.cache.entry(key).or_insert_with(init).into_value()
    }
}

impl<K, V> Default for ExpiringCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}
