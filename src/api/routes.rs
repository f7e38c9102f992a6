//! API Routes
//!
//! Configures the Axum router with the view and inventory endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_handler, invalidate_one_handler, preload_handler, stats_handler,
    view_handler, AppState,
};
use super::inventory::{
    create_category_handler, create_customer_handler, create_product_handler,
    create_supplier_handler, delete_category_handler, delete_customer_handler,
    delete_product_handler, delete_supplier_handler, purchase_handler, return_handler,
    sale_handler, update_category_handler, update_product_handler,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Views
        .route("/views/preload", post(preload_handler))
        .route("/views/invalidate", post(invalidate_handler))
        .route("/views/:key", get(view_handler).delete(invalidate_one_handler))
        // Inventory
        .route("/categories", post(create_category_handler))
        .route(
            "/categories/:id",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route("/suppliers", post(create_supplier_handler))
        .route("/suppliers/:id", delete(delete_supplier_handler))
        .route("/customers", post(create_customer_handler))
        .route("/customers/:id", delete(delete_customer_handler))
        .route("/products", post(create_product_handler))
        .route(
            "/products/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .route("/purchases", post(purchase_handler))
        .route("/sales", post(sale_handler))
        .route("/returns", post(return_handler))
        // Service
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{spawn_view_cache, ViewCache, DEFAULT_EXPIRATION};
    use crate::inventory::{InventoryService, MemoryStore};
    use crate::views::{InventoryViewBuilder, RenderedView};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = MemoryStore::new();
        let builder = Arc::new(InventoryViewBuilder::new(store.clone()));
        let (views, _task) =
            spawn_view_cache(ViewCache::<RenderedView>::new(builder, DEFAULT_EXPIRATION));
        let inventory = InventoryService::new(store, views.clone());
        create_router(AppState::new(views, inventory))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_view_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/views/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_view_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/views/invoices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preload_endpoint_accepted() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/views/preload")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"keys":["stock","sales"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_invalid_category_bad_request() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
