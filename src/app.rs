//! Application Lifecycle
//!
//! Wires the inventory store, the view cache owner task and the sweep task
//! together, and tears them down again.

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::cache::{spawn_view_cache, PreloadJob, ViewCache};
use crate::config::Config;
use crate::error::Result;
use crate::inventory::{InventoryService, MemoryStore};
use crate::tasks::{spawn_cleanup_task, PreloadReport};
use crate::views::{InventoryViewBuilder, RenderedView};

/// A running service: shared state plus the background tasks behind it.
pub struct App {
    state: AppState,
    cache_task: JoinHandle<()>,
    sweep_task: JoinHandle<()>,
    startup_preload: Option<PreloadJob>,
}

impl App {
    /// Starts the service over an empty store.
    pub async fn start(config: &Config) -> Result<Self> {
        Self::with_store(MemoryStore::new(), config).await
    }

    /// Starts the service over `store`.
    ///
    /// When `preload_on_start` is set, the configured views are preloaded in
    /// the background; this returns without waiting for them.
    pub async fn with_store(store: MemoryStore, config: &Config) -> Result<Self> {
        let builder = Arc::new(InventoryViewBuilder::new(store.clone()));
        let cache = ViewCache::<RenderedView>::new(builder, config.expiration());
        let (views, cache_task) = spawn_view_cache(cache);
        info!(expiration_secs = config.expiration_secs, "view cache started");

        let sweep_task = spawn_cleanup_task(views.clone(), config.sweep_interval());
        info!(
            interval_secs = config.sweep_interval_secs,
            "expired view sweep started"
        );

        let startup_preload = if config.preload_on_start {
            let job = views.preload(config.preload_views.clone()).await?;
            info!(views = ?job.keys(), "startup preload started");
            Some(job)
        } else {
            None
        };

        let inventory = InventoryService::new(store, views.clone());
        Ok(Self {
            state: AppState::new(views, inventory),
            cache_task,
            sweep_task,
            startup_preload,
        })
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    /// Waits for the startup preload, if one was started and not yet awaited.
    pub async fn wait_for_preload(&mut self) -> Result<Option<PreloadReport>> {
        match self.startup_preload.take() {
            Some(job) => Ok(Some(job.finished().await?)),
            None => Ok(None),
        }
    }

    /// Stops the sweep task and the cache owner task.
    ///
    /// Handles still held elsewhere report the cache as unavailable afterwards.
    pub async fn shutdown(self) {
        self.sweep_task.abort();
        self.cache_task.abort();

        for (name, task) in [("sweep", self.sweep_task), ("view cache", self.cache_task)] {
            match task.await {
                Err(err) if !err.is_cancelled() => warn!(task = name, error = %err, "task failed"),
                _ => {}
            }
        }
        info!("background tasks stopped");
    }
}
