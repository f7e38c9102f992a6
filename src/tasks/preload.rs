//! Preload Worker
//!
//! Builds a batch of views on the blocking pool and proposes each result to
//! the cache owner task.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{build_guarded, PreloadBatch, Proposal, ViewBuilder};

/// What a preload worker reports back for each key.
#[derive(Debug)]
pub enum PreloadEvent<V> {
    /// The view was built and is offered for insertion
    Built(Proposal<V>),
    /// The builder failed for this key
    Failed(String),
}

/// Outcome of a finished preload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Keys built and handed to the owner
    pub built: Vec<String>,
    /// Keys whose build failed
    pub failed: Vec<String>,
}

/// Spawns a worker that builds every key of `batch`.
///
/// A failing key is logged and skipped; the rest of the batch still runs. If
/// the owner has gone away the worker stops early. Nothing is cancellable: the
/// returned handle can be awaited for the report or simply dropped.
pub fn spawn_preload<V>(
    builder: Arc<dyn ViewBuilder<V>>,
    batch: PreloadBatch,
    events: mpsc::UnboundedSender<PreloadEvent<V>>,
) -> JoinHandle<PreloadReport>
where
    V: Send + 'static,
{
    let PreloadBatch { keys, generation } = batch;

    tokio::task::spawn_blocking(move || {
        let mut report = PreloadReport::default();

        for key in keys {
            match build_guarded(builder.as_ref(), &key) {
                Ok(value) => {
                    let proposal = Proposal {
                        key: key.clone(),
                        generation,
                        value,
                    };
                    if events.send(PreloadEvent::Built(proposal)).is_err() {
                        debug!("view cache stopped, abandoning preload");
                        break;
                    }
                    report.built.push(key);
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "preload build failed, skipping");
                    let _ = events.send(PreloadEvent::Failed(key.clone()));
                    report.failed.push(key);
                }
            }
        }

        info!(
            built = report.built.len(),
            failed = report.failed.len(),
            "preload batch finished"
        );
        report
    })
}
