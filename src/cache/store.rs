//! View Cache Store Module
//!
//! The thread-confined cache map: lazy expiry on read, explicit invalidation
//! and acceptance of views built by preload workers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{build_guarded, BuildError, CacheEntry, CacheStats, ViewBuilder};

// == Preload Types ==
/// Keys a preload worker should build, stamped with the invalidation
/// generation current when the batch started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadBatch {
    pub keys: Vec<String>,
    pub generation: u64,
}

/// A view built off the owner, offered back for insertion.
#[derive(Debug)]
pub struct Proposal<V> {
    pub key: String,
    pub generation: u64,
    pub value: V,
}

// == View Cache ==
/// Cache of built views keyed by view name.
///
/// A `ViewCache` is owned by exactly one task (see
/// [`spawn_view_cache`](crate::cache::spawn_view_cache)); preload workers never
/// touch it directly and hand their results over as [`Proposal`]s.
pub struct ViewCache<V> {
    /// Built views
    entries: HashMap<String, CacheEntry<V>>,
    /// Constructs views on a miss
    builder: Arc<dyn ViewBuilder<V>>,
    /// Lifetime of an entry
    expiration: Duration,
    /// Performance statistics
    stats: CacheStats,
    /// Bumped by every invalidation
    generation: u64,
    /// Generation at which each key was last invalidated, kept only while
    /// a preload for the key is outstanding
    invalidated_at: HashMap<String, u64>,
    /// Outstanding preload results per key
    in_flight: HashMap<String, usize>,
}

impl<V> ViewCache<V> {
    // == Constructor ==
    /// Creates an empty cache around `builder`.
    pub fn new(builder: Arc<dyn ViewBuilder<V>>, expiration: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            builder,
            expiration,
            stats: CacheStats::new(),
            generation: 0,
            invalidated_at: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    // == Get ==
    /// Returns the cached view for `key`, building and storing it when absent
    /// or expired.
    ///
    /// On build failure nothing is stored and the error is returned.
    pub fn get(&mut self, key: &str) -> Result<Arc<V>, BuildError> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(self.expiration) {
                self.stats.record_hit();
                return Ok(entry.value());
            }

            self.entries.remove(key);
            self.stats.record_expirations(1);
            debug!(key, "view expired, rebuilding");
        }

        self.stats.record_miss();
        match build_guarded(self.builder.as_ref(), key) {
            Ok(view) => {
                let value = Arc::new(view);
                self.entries
                    .insert(key.to_string(), CacheEntry::new(Arc::clone(&value)));
                self.stats.record_build();
                self.stats.set_total_entries(self.entries.len());
                debug!(key, "view built");
                Ok(value)
            }
            Err(err) => {
                self.stats.record_build_failure();
                self.stats.set_total_entries(self.entries.len());
                Err(err)
            }
        }
    }

    // == Peek ==
    /// Returns the fresh cached view for `key` without building or counting.
    pub fn peek(&self, key: &str) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.expiration))
            .map(CacheEntry::value)
    }

    /// Checks whether a fresh entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    // == Invalidate ==
    /// Removes the entry for `key`, returning whether one existed.
    ///
    /// Invalidating an absent key changes no entries. A key with a preload
    /// outstanding is marked so that the preload cannot reinsert a view built
    /// before now.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.generation += 1;
        if self.in_flight.contains_key(key) {
            self.invalidated_at.insert(key.to_string(), self.generation);
        }

        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "view invalidated");
        }
        removed
    }

    /// Invalidates every key in `keys`, returning how many entries were removed.
    pub fn invalidate_all<'a, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter().filter(|key| self.invalidate(key)).count()
    }

    // == Preload ==
    /// Starts a preload batch for the keys that are not already cached.
    ///
    /// Duplicates are dropped; input order is otherwise kept. Every key of the
    /// batch stays outstanding until its proposal or failure is applied.
    pub fn begin_preload<I, K>(&mut self, keys: I) -> PreloadBatch
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::<String>::into)
            .filter(|key| !self.contains(key))
            .filter(|key| seen.insert(key.clone()))
            .collect();

        for key in &keys {
            *self.in_flight.entry(key.clone()).or_default() += 1;
        }

        PreloadBatch {
            keys,
            generation: self.generation,
        }
    }

    /// Offers a preloaded view for insertion.
    ///
    /// The proposal is discarded when its key was invalidated after the batch
    /// started, or when a fresh entry already exists (the instance already
    /// handed out stays the cached one). Returns whether it was inserted.
    pub fn accept(&mut self, proposal: Proposal<V>) -> bool {
        let Proposal {
            key,
            generation,
            value,
        } = proposal;

        let stale = self
            .invalidated_at
            .get(&key)
            .is_some_and(|&invalidated| invalidated > generation);
        self.settle(&key);
        if stale || self.contains(&key) {
            self.stats.record_discarded();
            debug!(key = %key, stale, "preloaded view discarded");
            return false;
        }

        self.entries.insert(key, CacheEntry::new(Arc::new(value)));
        self.stats.record_preloaded();
        self.stats.set_total_entries(self.entries.len());
        true
    }

    /// Counts a preload build of `key` that failed.
    pub fn record_preload_failure(&mut self, key: &str) {
        self.settle(key);
        self.stats.record_build_failure();
    }

    /// Marks one preload result for `key` as applied. Once none are left the
    /// key's invalidation mark is no longer needed.
    fn settle(&mut self, key: &str) {
        let Some(outstanding) = self.in_flight.get_mut(key) else {
            return;
        };
        *outstanding -= 1;
        if *outstanding == 0 {
            self.in_flight.remove(key);
            self.invalidated_at.remove(key);
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expiration = self.expiration;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(expiration));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Accessors ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the builder, for handing to preload workers.
    pub fn builder(&self) -> Arc<dyn ViewBuilder<V>> {
        Arc::clone(&self.builder)
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
