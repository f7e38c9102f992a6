//! Inventory Handlers
//!
//! HTTP handlers for inventory mutations. Each one goes through
//! [`InventoryService`](crate::inventory::InventoryService), so a successful
//! mutation drops the cached views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::handlers::AppState;
use crate::error::Result;
use crate::inventory::{Category, Customer, Product, ProductReturn, Supplier, Transaction};
use crate::models::{
    CategoryRequest, DeleteResponse, PartyRequest, ProductRequest, PurchaseRequest,
    ReturnRequest, SaleRequest,
};

type Created<T> = Result<(StatusCode, Json<T>)>;

fn created<T>(record: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(record)))
}

// == Categories ==
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Created<Category> {
    created(state.inventory.create_category(&req).await?)
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    Ok(Json(state.inventory.update_category(id, &req).await?))
}

/// Handler for DELETE /categories/:id
///
/// Fails with 409 while products still belong to the category.
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.inventory.delete_category(id).await?;
    Ok(Json(DeleteResponse::new("Category", id)))
}

// == Suppliers and Customers ==
pub async fn create_supplier_handler(
    State(state): State<AppState>,
    Json(req): Json<PartyRequest>,
) -> Created<Supplier> {
    created(state.inventory.create_supplier(&req).await?)
}

pub async fn delete_supplier_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.inventory.delete_supplier(id).await?;
    Ok(Json(DeleteResponse::new("Supplier", id)))
}

pub async fn create_customer_handler(
    State(state): State<AppState>,
    Json(req): Json<PartyRequest>,
) -> Created<Customer> {
    created(state.inventory.create_customer(&req).await?)
}

pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.inventory.delete_customer(id).await?;
    Ok(Json(DeleteResponse::new("Customer", id)))
}

// == Products ==
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Created<Product> {
    created(state.inventory.create_product(&req).await?)
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>> {
    Ok(Json(state.inventory.update_product(id, &req).await?))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.inventory.delete_product(id).await?;
    Ok(Json(DeleteResponse::new("Product", id)))
}

// == Transactions ==
/// Handler for POST /purchases
///
/// Adds the purchased quantity to stock.
pub async fn purchase_handler(
    State(state): State<AppState>,
    Json(req): Json<PurchaseRequest>,
) -> Created<Transaction> {
    created(state.inventory.record_purchase(&req).await?)
}

/// Handler for POST /sales
///
/// Fails with 409 when stock is insufficient.
pub async fn sale_handler(
    State(state): State<AppState>,
    Json(req): Json<SaleRequest>,
) -> Created<Transaction> {
    created(state.inventory.record_sale(&req).await?)
}

pub async fn return_handler(
    State(state): State<AppState>,
    Json(req): Json<ReturnRequest>,
) -> Created<ProductReturn> {
    created(state.inventory.record_return(&req).await?)
}
