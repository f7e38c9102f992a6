//! Response DTOs for the inventory view API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::views::RenderedView;

/// Response body for `GET /views/:key`
#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse {
    pub key: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows in the view before filtering
    pub total_rows: usize,
    pub generated_at: DateTime<Utc>,
    pub instance: Uuid,
}

impl ViewResponse {
    /// Renders `view`, keeping only rows matching `query` when one is given.
    pub fn new(view: &RenderedView, query: Option<&str>) -> Self {
        let rows = match query {
            Some(query) => view.filter(query),
            None => view.rows.clone(),
        };
        Self {
            key: view.key.clone(),
            title: view.title.clone(),
            columns: view.columns.clone(),
            rows,
            total_rows: view.rows.len(),
            generated_at: view.generated_at,
            instance: view.instance,
        }
    }
}

/// Response body for `POST /views/preload`
#[derive(Debug, Clone, Serialize)]
pub struct PreloadResponse {
    pub message: String,
    /// Keys being built (already cached keys are skipped)
    pub keys: Vec<String>,
}

impl PreloadResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            message: format!("Preloading {} views", keys.len()),
            keys,
        }
    }
}

/// Response body for view invalidation
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    /// Number of cached views removed
    pub invalidated: usize,
}

impl InvalidateResponse {
    pub fn new(invalidated: usize) -> Self {
        Self {
            message: format!("{} views invalidated", invalidated),
            invalidated,
        }
    }
}

/// Response body for deletions
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: Uuid,
}

impl DeleteResponse {
    pub fn new(entity: &str, id: Uuid) -> Self {
        Self {
            message: format!("{} '{}' deleted successfully", entity, id),
            id,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
