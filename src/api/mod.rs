//! API Module
//!
//! HTTP handlers and routing for the inventory view service.
//!
//! # Endpoints
//! - `GET /views/:key` - Render a view through the cache (`?q=` filters rows)
//! - `DELETE /views/:key` - Invalidate one view
//! - `POST /views/preload` - Build views in the background
//! - `POST /views/invalidate` - Invalidate several views
//! - `POST|PUT|DELETE` on `/categories`, `/suppliers`, `/customers`, `/products`
//! - `POST /purchases`, `/sales`, `/returns` - Record stock movements
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod inventory;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
