//! Inventory Module
//!
//! Domain records, their in-memory store, and the service that keeps the
//! view cache consistent with mutations.

mod model;
mod service;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use model::{
    Category, Customer, Inventory, Product, ProductReturn, Supplier, Transaction,
    TransactionKind,
};
pub use service::InventoryService;
pub use store::{MemoryStore, StoreError, StoreResult};
