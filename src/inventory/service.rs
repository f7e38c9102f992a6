//! Inventory Service
//!
//! Applies mutations to the store and, when one succeeds, invalidates the
//! cached views rendered from inventory data.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::ViewCacheHandle;
use crate::error::Result;
use crate::inventory::{
    Category, Customer, MemoryStore, Product, ProductReturn, StoreResult, Supplier, Transaction,
};
use crate::models::{
    CategoryRequest, PartyRequest, ProductRequest, PurchaseRequest, ReturnRequest, SaleRequest,
};
use crate::views::{inventory_views, RenderedView};

/// Mutation entry point for inventory data.
///
/// Every successful mutation invalidates all of
/// [`INVENTORY_VIEWS`](crate::views::INVENTORY_VIEWS); they are
/// rebuilt lazily on next access. A failed mutation leaves the cache alone.
#[derive(Clone)]
pub struct InventoryService {
    store: MemoryStore,
    views: ViewCacheHandle<RenderedView>,
}

impl InventoryService {
    pub fn new(store: MemoryStore, views: ViewCacheHandle<RenderedView>) -> Self {
        Self { store, views }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    async fn commit<T>(&self, operation: &'static str, outcome: StoreResult<T>) -> Result<T> {
        let value = outcome?;

        match self.views.invalidate_all(inventory_views()).await {
            Ok(removed) => debug!(operation, removed, "inventory changed, views invalidated"),
            Err(err) => warn!(operation, error = %err, "could not invalidate views"),
        }
        Ok(value)
    }

    pub async fn create_category(&self, req: &CategoryRequest) -> Result<Category> {
        self.commit("create_category", self.store.create_category(req))
            .await
    }

    pub async fn update_category(&self, id: Uuid, req: &CategoryRequest) -> Result<Category> {
        self.commit("update_category", self.store.update_category(id, req))
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        self.commit("delete_category", self.store.delete_category(id))
            .await
    }

    pub async fn create_supplier(&self, req: &PartyRequest) -> Result<Supplier> {
        self.commit("create_supplier", self.store.create_supplier(req))
            .await
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<()> {
        self.commit("delete_supplier", self.store.delete_supplier(id))
            .await
    }

    pub async fn create_customer(&self, req: &PartyRequest) -> Result<Customer> {
        self.commit("create_customer", self.store.create_customer(req))
            .await
    }

    pub async fn delete_customer(&self, id: Uuid) -> Result<()> {
        self.commit("delete_customer", self.store.delete_customer(id))
            .await
    }

    pub async fn create_product(&self, req: &ProductRequest) -> Result<Product> {
        self.commit("create_product", self.store.create_product(req))
            .await
    }

    pub async fn update_product(&self, id: Uuid, req: &ProductRequest) -> Result<Product> {
        self.commit("update_product", self.store.update_product(id, req))
            .await
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<()> {
        self.commit("delete_product", self.store.delete_product(id))
            .await
    }

    pub async fn record_purchase(&self, req: &PurchaseRequest) -> Result<Transaction> {
        self.commit("record_purchase", self.store.record_purchase(req))
            .await
    }

    pub async fn record_sale(&self, req: &SaleRequest) -> Result<Transaction> {
        self.commit("record_sale", self.store.record_sale(req))
            .await
    }

    pub async fn record_return(&self, req: &ReturnRequest) -> Result<ProductReturn> {
        self.commit("record_return", self.store.record_return(req))
            .await
    }
}
