//! Background Tasks Module
//!
//! Work that runs off the request path.
//!
//! # Tasks
//! - Expiry sweep: evicts expired views at the configured interval
//! - Preload worker: builds a batch of views on the blocking pool

mod cleanup;
mod preload;

pub use cleanup::spawn_cleanup_task;
pub use preload::{spawn_preload, PreloadEvent, PreloadReport};
