//! Cache Owner Task
//!
//! Runs a [`ViewCache`] on a single task. Callers talk to it through a
//! cloneable [`ViewCacheHandle`]; preload workers send their results back to
//! the same task, which performs the final insertion.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{BuildError, CacheStats, ViewCache, COMMAND_BUFFER};
use crate::error::{AppError, Result};
use crate::tasks::{spawn_preload, PreloadEvent, PreloadReport};

enum Command<V> {
    Get {
        key: String,
        reply: oneshot::Sender<std::result::Result<Arc<V>, BuildError>>,
    },
    Contains {
        key: String,
        reply: oneshot::Sender<bool>,
    },
    Invalidate {
        keys: Vec<String>,
        reply: oneshot::Sender<usize>,
    },
    Preload {
        keys: Vec<String>,
        reply: oneshot::Sender<PreloadJob>,
    },
    Sweep {
        reply: oneshot::Sender<usize>,
    },
    Stats {
        reply: oneshot::Sender<CacheStats>,
    },
}

// == Preload Job ==
/// A preload batch running in the background.
///
/// Dropping the job leaves the batch running; awaiting [`PreloadJob::finished`]
/// waits for the worker to build every key.
#[derive(Debug)]
pub struct PreloadJob {
    keys: Vec<String>,
    task: JoinHandle<PreloadReport>,
}

impl PreloadJob {
    /// Keys the worker was asked to build (already cached keys excluded).
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Waits for the worker to finish.
    ///
    /// Built views are queued for the owner when this returns and are in the
    /// cache before the owner serves any later command.
    pub async fn finished(self) -> Result<PreloadReport> {
        self.task
            .await
            .map_err(|err| AppError::Internal(format!("preload worker failed: {err}")))
    }
}

// == Handle ==
/// Cloneable access to the cache owner task.
pub struct ViewCacheHandle<V> {
    commands: mpsc::Sender<Command<V>>,
}

impl<V> Clone for ViewCacheHandle<V> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<V> ViewCacheHandle<V>
where
    V: Send + Sync + 'static,
{
    /// Returns the view for `key`, building it on the owner task on a miss.
    pub async fn get(&self, key: &str) -> Result<Arc<V>> {
        let key = key.to_string();
        let built = self.request(|reply| Command::Get { key, reply }).await?;
        Ok(built?)
    }

    /// Checks whether a fresh view is cached for `key`.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.request(|reply| Command::Contains { key, reply }).await
    }

    /// Drops the view for `key`. Returns whether one was cached.
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        let removed = self.invalidate_all(vec![key.to_string()]).await?;
        Ok(removed > 0)
    }

    /// Drops the views for `keys`. Returns how many were cached.
    pub async fn invalidate_all(&self, keys: Vec<String>) -> Result<usize> {
        self.request(|reply| Command::Invalidate { keys, reply })
            .await
    }

    /// Starts building `keys` in the background.
    ///
    /// Returns as soon as the worker is spawned.
    pub async fn preload(&self, keys: Vec<String>) -> Result<PreloadJob> {
        self.request(|reply| Command::Preload { keys, reply }).await
    }

    /// Evicts expired views. Returns how many were removed.
    pub async fn sweep(&self) -> Result<usize> {
        self.request(|reply| Command::Sweep { reply }).await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command<V>,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| owner_stopped())?;
        response.await.map_err(|_| owner_stopped())
    }
}

fn owner_stopped() -> AppError {
    AppError::Unavailable("view cache task has stopped".to_string())
}

// == Owner Task ==
/// Moves `cache` onto its own task and returns a handle to it.
///
/// The task stops once every handle is dropped, or when the returned
/// `JoinHandle` is aborted.
pub fn spawn_view_cache<V>(cache: ViewCache<V>) -> (ViewCacheHandle<V>, JoinHandle<()>)
where
    V: Send + Sync + 'static,
{
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(cache, commands_rx));

    (
        ViewCacheHandle {
            commands: commands_tx,
        },
        task,
    )
}

async fn run<V>(mut cache: ViewCache<V>, mut commands: mpsc::Receiver<Command<V>>)
where
    V: Send + Sync + 'static,
{
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    info!(
        expiration_secs = cache.expiration().as_secs(),
        "view cache task started"
    );

    loop {
        // Preload results are applied before the next command is served.
        tokio::select! {
            biased;
            Some(event) = events_rx.recv() => apply_event(&mut cache, event),
            command = commands.recv() => match command {
                Some(command) => handle_command(&mut cache, command, &events_tx),
                None => break,
            },
        }
    }

    info!("view cache task stopped");
}

fn apply_event<V>(cache: &mut ViewCache<V>, event: PreloadEvent<V>) {
    match event {
        PreloadEvent::Built(proposal) => {
            cache.accept(proposal);
        }
        PreloadEvent::Failed(key) => cache.record_preload_failure(&key),
    }
}

fn handle_command<V>(
    cache: &mut ViewCache<V>,
    command: Command<V>,
    events: &mpsc::UnboundedSender<PreloadEvent<V>>,
) where
    V: Send + Sync + 'static,
{
    match command {
        Command::Get { key, reply } => {
            let _ = reply.send(cache.get(&key));
        }
        Command::Contains { key, reply } => {
            let _ = reply.send(cache.contains(&key));
        }
        Command::Invalidate { keys, reply } => {
            let removed = cache.invalidate_all(keys.iter().map(String::as_str));
            debug!(requested = keys.len(), removed, "views invalidated");
            let _ = reply.send(removed);
        }
        Command::Preload { keys, reply } => {
            let batch = cache.begin_preload(keys);
            debug!(keys = ?batch.keys, "starting preload batch");
            let keys = batch.keys.clone();
            let task = spawn_preload(cache.builder(), batch, events.clone());
            let _ = reply.send(PreloadJob { keys, task });
        }
        Command::Sweep { reply } => {
            let _ = reply.send(cache.cleanup_expired());
        }
        Command::Stats { reply } => {
            let _ = reply.send(cache.stats());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::CountingBuilder;
    use crate::cache::DEFAULT_EXPIRATION;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn spawn_with(
        builder: &Arc<CountingBuilder>,
        expiration: Duration,
    ) -> (ViewCacheHandle<String>, JoinHandle<()>) {
        spawn_view_cache(ViewCache::<String>::new(builder.clone(), expiration))
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_get_returns_same_instance() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let first = assert_ok!(cache.get("stock").await);
        let second = assert_ok!(cache.get("stock").await);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builder.builds(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_view_is_error() {
        let builder = CountingBuilder::failing(&["ghost"]);
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let err = assert_err!(cache.get("ghost").await);

        assert!(matches!(err, AppError::ViewNotFound(ref key) if key == "ghost"));
        assert!(!assert_ok!(cache.contains("ghost").await));
    }

    #[tokio::test]
    async fn test_invalidate_then_get_rebuilds() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let first = assert_ok!(cache.get("sales").await);
        assert!(assert_ok!(cache.invalidate("sales").await));
        let second = assert_ok!(cache.get("sales").await);

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(builder.builds(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_missing_key_is_noop() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);
        assert_ok!(cache.get("stock").await);

        assert!(!assert_ok!(cache.invalidate("nothing").await));
        assert!(assert_ok!(cache.contains("stock").await));
    }

    #[tokio::test]
    async fn test_preload_skips_failures() {
        let builder = CountingBuilder::failing(&["b"]);
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let job = assert_ok!(cache.preload(keys(&["a", "b", "c"])).await);
        let report = assert_ok!(job.finished().await);

        assert_eq!(report.built, keys(&["a", "c"]));
        assert_eq!(report.failed, keys(&["b"]));
        assert!(assert_ok!(cache.contains("a").await));
        assert!(!assert_ok!(cache.contains("b").await));
        assert!(assert_ok!(cache.contains("c").await));

        let stats = assert_ok!(cache.stats().await);
        assert_eq!(stats.preloaded, 2);
        assert_eq!(stats.build_failures, 1);
        assert_eq!(stats.total_entries, 2);
    }

    #[tokio::test]
    async fn test_preloaded_view_served_without_build() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let job = assert_ok!(cache.preload(keys(&["stock"])).await);
        assert_ok!(job.finished().await);

        assert_ok!(cache.get("stock").await);
        assert_eq!(builder.builds(), 1);
        assert_eq!(assert_ok!(cache.stats().await).hits, 1);
    }

    #[tokio::test]
    async fn test_preload_skips_cached_keys() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);
        assert_ok!(cache.get("stock").await);

        let job = assert_ok!(cache.preload(keys(&["stock", "sales"])).await);

        assert_eq!(job.keys(), keys(&["sales"]).as_slice());
        assert_ok!(job.finished().await);
        assert_eq!(builder.builds(), 2);
    }

    #[tokio::test]
    async fn test_get_during_preload_stores_one_value() {
        let builder = CountingBuilder::slow(Duration::from_millis(50));
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let job = assert_ok!(cache.preload(keys(&["stock"])).await);
        let served = assert_ok!(cache.get("stock").await);
        assert_ok!(job.finished().await);

        let again = assert_ok!(cache.get("stock").await);
        assert!(Arc::ptr_eq(&served, &again));

        let stats = assert_ok!(cache.stats().await);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.preloaded + stats.discarded, 1);
    }

    #[tokio::test]
    async fn test_invalidate_during_preload_discards_result() {
        let builder = CountingBuilder::slow(Duration::from_millis(50));
        let (cache, _task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        let job = assert_ok!(cache.preload(keys(&["stock"])).await);
        assert_ok!(cache.invalidate("stock").await);
        assert_ok!(job.finished().await);

        assert!(!assert_ok!(cache.contains("stock").await));
        assert_eq!(assert_ok!(cache.stats().await).discarded, 1);
    }

    #[tokio::test]
    async fn test_sweep_removes_expired() {
        let builder = CountingBuilder::new();
        let (cache, _task) = spawn_with(&builder, Duration::from_millis(30));
        assert_ok!(cache.get("stock").await);

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(assert_ok!(cache.sweep().await), 1);
        assert_eq!(assert_ok!(cache.stats().await).total_entries, 0);
    }

    #[tokio::test]
    async fn test_stopped_owner_is_unavailable() {
        let builder = CountingBuilder::new();
        let (cache, task) = spawn_with(&builder, DEFAULT_EXPIRATION);

        task.abort();
        let _ = task.await;

        let err = assert_err!(cache.get("stock").await);
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    fn spawn_panicking() -> (ViewCacheHandle<String>, JoinHandle<()>) {
        let builder = |key: &str| -> std::result::Result<String, BuildError> {
            if key == "broken" {
                panic!("renderer bug");
            }
            Ok(format!("<{key}>"))
        };
        spawn_view_cache(ViewCache::<String>::new(Arc::new(builder), DEFAULT_EXPIRATION))
    }

    #[tokio::test]
    async fn test_panicking_build_keeps_owner_running() {
        let (cache, task) = spawn_panicking();

        let err = assert_err!(cache.get("broken").await);
        assert!(matches!(err, AppError::Build(ref msg) if msg.contains("renderer bug")));

        assert_eq!(*assert_ok!(cache.get("stock").await), "<stock>");
        assert_eq!(assert_ok!(cache.stats().await).build_failures, 1);
        assert!(!task.is_finished());
    }

    #[tokio::test]
    async fn test_panicking_preload_reported_as_failure() {
        let (cache, _task) = spawn_panicking();

        let job = assert_ok!(cache.preload(keys(&["broken", "sales"])).await);
        let report = assert_ok!(job.finished().await);

        assert_eq!(report.built, keys(&["sales"]));
        assert_eq!(report.failed, keys(&["broken"]));
        assert!(assert_ok!(cache.contains("sales").await));
    }
}
