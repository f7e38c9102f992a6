//! Expiry Sweep Task
//!
//! Background task that periodically evicts expired views.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ViewCacheHandle;

/// Spawns a background task that asks the cache owner to drop expired views
/// every `interval`.
///
/// The task exits on its own once the cache owner has stopped; it can also be
/// aborted through the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let (cache, _owner) = spawn_view_cache(ViewCache::new(builder, DEFAULT_EXPIRATION));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: ViewCacheHandle<V>, interval: Duration) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting view expiry sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            match cache.sweep().await {
                Ok(0) => debug!("Expiry sweep: no expired views found"),
                Ok(removed) => info!("Expiry sweep: removed {} expired views", removed),
                Err(err) => {
                    warn!(error = %err, "Expiry sweep stopping");
                    break;
                }
            }
        }
    })
}
