//! API Handlers
//!
//! HTTP request handlers for the view cache endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::cache::ViewCacheHandle;
use crate::error::{AppError, Result};
use crate::inventory::InventoryService;
use crate::models::{
    HealthResponse, InvalidateRequest, InvalidateResponse, PreloadRequest, PreloadResponse,
    StatsResponse, ViewQuery, ViewResponse,
};
use crate::views::{inventory_views, RenderedView};

/// Application state shared across all handlers.
///
/// Both fields are cheap handles; cloning the state clones the handles.
#[derive(Clone)]
pub struct AppState {
    /// Owner task of the view cache
    pub views: ViewCacheHandle<RenderedView>,
    /// Inventory mutations, invalidating views on success
    pub inventory: InventoryService,
}

impl AppState {
    pub fn new(views: ViewCacheHandle<RenderedView>, inventory: InventoryService) -> Self {
        Self { views, inventory }
    }
}

/// Handler for GET /views/:key
///
/// Serves the view from the cache, building it on a miss. `?q=` filters rows.
pub async fn view_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    let view = state.views.get(&key).await?;
    Ok(Json(ViewResponse::new(&view, query.q.as_deref())))
}

/// Handler for POST /views/preload
///
/// Starts a background preload and returns without waiting for it.
/// Without a body, every inventory view is preloaded.
pub async fn preload_handler(
    State(state): State<AppState>,
    body: Option<Json<PreloadRequest>>,
) -> Result<(StatusCode, Json<PreloadResponse>)> {
    let keys = body
        .and_then(|Json(req)| req.keys)
        .unwrap_or_else(inventory_views);
    if keys.iter().any(|key| key.is_empty()) {
        return Err(AppError::InvalidRequest("Key cannot be empty".to_string()));
    }

    let job = state.views.preload(keys).await?;
    debug!(keys = ?job.keys(), "preload started");

    Ok((
        StatusCode::ACCEPTED,
        Json(PreloadResponse::new(job.keys().to_vec())),
    ))
}

/// Handler for POST /views/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let removed = state.views.invalidate_all(req.keys).await?;
    Ok(Json(InvalidateResponse::new(removed)))
}

/// Handler for DELETE /views/:key
///
/// Invalidating a view that is not cached succeeds with a count of zero.
pub async fn invalidate_one_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.views.invalidate(&key).await?;
    Ok(Json(InvalidateResponse::new(usize::from(removed))))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.views.stats().await?;
    Ok(Json(StatsResponse::new(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
