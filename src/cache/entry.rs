//! Cache Entry Module
//!
//! Defines a single cached view together with its creation time.

use std::sync::Arc;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// A built view owned by the cache.
///
/// Callers only ever receive clones of the `Arc`, never the entry itself.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored view
    value: Arc<V>,
    /// When the view was built
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: Arc<V>) -> Self {
        Self::with_created_at(value, Instant::now())
    }

    /// Creates an entry with an explicit creation time.
    pub fn with_created_at(value: Arc<V>, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    /// Returns a shared reference to the view.
    pub fn value(&self) -> Arc<V> {
        Arc::clone(&self.value)
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `window`.
    pub fn is_expired(&self, window: Duration) -> bool {
        self.is_expired_at(Instant::now(), window)
    }

    /// Checks expiry against a given point in time.
    ///
    /// Boundary condition: an entry is expired once its age is greater than or
    /// equal to the window.
    pub fn is_expired_at(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= window
    }

    // == Time To Live ==
    /// Returns how long the entry stays valid, zero once expired.
    pub fn remaining(&self, window: Duration) -> Duration {
        window.saturating_sub(self.created_at.elapsed())
    }
}
