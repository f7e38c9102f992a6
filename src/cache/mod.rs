//! View Cache Module
//!
//! Keeps built views keyed by name, with time-based expiry, explicit
//! invalidation and background preloading.

mod builder;
mod entry;
mod service;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

// Re-export public types
pub use builder::{build_guarded, BuildError, ViewBuilder};
pub use entry::CacheEntry;
pub use service::{spawn_view_cache, PreloadJob, ViewCacheHandle};
pub use stats::CacheStats;
pub use store::{PreloadBatch, Proposal, ViewCache};

// == Public Constants ==
/// Default lifetime of a cached view (30 minutes)
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(30 * 60);

/// Capacity of the command mailbox of the cache owner task
pub const COMMAND_BUFFER: usize = 256;
