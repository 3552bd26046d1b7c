//! # Enrichment Client
//!
//! Decorates titles with display metadata from a [`MetadataProvider`],
//! memoized in a bounded LRU cache keyed by normalized title.
//!
//! Lookups never fail: provider errors, timeouts and titles with no match
//! all produce (and cache) the empty record. The lock is held only around
//! cache reads and writes, never across provider calls, so concurrent
//! misses for the same title may each query the provider.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use reelmatch_core::normalize;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{EnrichError, Result};
use crate::provider::{Category, MetadataProvider};
use crate::record::EnrichmentRecord;

/// Default number of cached titles.
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Cache settings for [`EnrichmentClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached titles. Zero disables caching.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached titles.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the provider chain.
    pub misses: u64,
    /// Entries dropped for capacity.
    pub evictions: u64,
    /// Entries currently cached.
    pub entries: usize,
}

type RecordCache = Mutex<LruCache<String, EnrichmentRecord>>;

fn build_cache(capacity: usize) -> Option<RecordCache> {
    NonZeroUsize::new(capacity).map(|capacity| Mutex::new(LruCache::new(capacity)))
}

fn lock(cache: &RecordCache) -> MutexGuard<'_, LruCache<String, EnrichmentRecord>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cached, failure-absorbing metadata lookup.
pub struct EnrichmentClient<P> {
    provider: P,
    /// `None` when the configured capacity is zero.
    cache: Option<RecordCache>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<P: MetadataProvider> EnrichmentClient<P> {
    /// Create a client over `provider`.
    pub fn new(provider: P, config: CacheConfig) -> Self {
        Self {
            provider,
            cache: build_cache(config.capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Metadata for `title`, from cache when possible.
    ///
    /// Never fails; absent or unavailable metadata yields
    /// [`EnrichmentRecord::empty`].
    pub fn lookup(&self, title: &str) -> EnrichmentRecord {
        let key = normalize(title);
        if key.is_empty() {
            return EnrichmentRecord::empty();
        }

        if let Some(record) = self.cached(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(title = %key, "enrichment cache hit");
            return record;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let record = match self.fetch(title.trim()) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(title = %key, "no provider match");
                EnrichmentRecord::empty()
            }
            Err(EnrichError::MissingApiKey) => {
                debug!(title = %key, "provider has no API key");
                EnrichmentRecord::empty()
            }
            Err(err) => {
                warn!(title = %key, timeout = err.is_timeout(), error = %err, "enrichment lookup failed");
                EnrichmentRecord::empty()
            }
        };

        self.store(key, record.clone());
        record
    }

    /// Returns `true` if `title` is cached. Does not touch recency.
    pub fn is_cached(&self, title: &str) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| lock(cache).peek(&normalize(title)).is_some())
    }

    /// Current cache counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.cache.as_ref().map_or(0, |cache| lock(cache).len()),
        }
    }

    /// Drops every cached record.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            lock(cache).clear();
        }
    }

    fn cached(&self, key: &str) -> Option<EnrichmentRecord> {
        let cache = self.cache.as_ref()?;
        lock(cache).get(key).cloned()
    }

    fn store(&self, key: String, record: EnrichmentRecord) {
        let Some(cache) = &self.cache else {
            return;
        };
        // `push` also hands back the old value when a concurrent miss already
        // stored this key; only a different key is an eviction.
        let displaced = lock(cache).push(key.clone(), record);
        if let Some((evicted, _)) = displaced.filter(|(old, _)| *old != key) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(evicted = %evicted, "enrichment cache eviction");
        }
    }

    /// Runs the category chain; the first category with a search hit wins.
    fn fetch(&self, title: &str) -> Result<Option<EnrichmentRecord>> {
        for category in Category::CHAIN {
            let ids = self.provider.search(category, title)?;
            let Some(&id) = ids.first() else {
                trace!(category = %category, title, "no search results");
                continue;
            };

            let detail = self.provider.detail(category, id)?;
            debug!(category = %category, id, title, "enriched title");
            return Ok(Some(
                detail.into_record(|path| self.provider.poster_url(path)),
            ));
        }
        Ok(None)
    }
}
