//! Stockroom - inventory views behind a thread-confined view cache
//!
//! Rendered inventory tables are cached per key, expire after a fixed window,
//! can be preloaded in the background, and are invalidated whenever the
//! inventory changes.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod tasks;
pub mod views;

pub use api::{create_router, AppState};
pub use app::App;
pub use cache::{spawn_view_cache, ViewCache, ViewCacheHandle};
pub use config::Config;
pub use error::{AppError, Result};
pub use inventory::{InventoryService, MemoryStore};
