//! Inventory Store Module
//!
//! In-memory persistence for inventory records. Every mutation validates its
//! input and either applies completely or leaves the data untouched.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::inventory::{
    Category, Customer, Inventory, Product, ProductReturn, Supplier, Transaction,
    TransactionKind,
};
use crate::models::{
    CategoryRequest, PartyRequest, ProductRequest, PurchaseRequest, ReturnRequest, SaleRequest,
};

// == Store Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// The input failed validation
    #[error("{0}")]
    Invalid(String),

    /// The mutation clashes with existing records
    #[error("{0}")]
    Conflict(String),

    /// The store cannot be used
    #[error("inventory store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

fn check(validation: Option<String>) -> StoreResult<()> {
    match validation {
        Some(msg) => Err(StoreError::Invalid(msg)),
        None => Ok(()),
    }
}

/// Rejects a transaction whose total would not fit in a `u64`.
fn line_total(unit_price: u64, quantity: u32) -> StoreResult<u64> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or_else(|| StoreError::Invalid("Transaction total is too large".to_string()))
}

fn not_found(entity: &'static str, id: Uuid) -> StoreError {
    StoreError::NotFound { entity, id }
}

// == Memory Store ==
/// Shared, thread-safe inventory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inventory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a consistent copy of all records.
    pub fn snapshot(&self) -> StoreResult<Inventory> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inventory>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inventory>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    // == Categories ==
    pub fn create_category(&self, req: &CategoryRequest) -> StoreResult<Category> {
        check(req.validate())?;
        let mut inventory = self.write()?;

        let category = Category {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            description: req.description.clone(),
        };
        inventory.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(&self, id: Uuid, req: &CategoryRequest) -> StoreResult<Category> {
        check(req.validate())?;
        let mut inventory = self.write()?;

        let category = inventory
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("category", id))?;
        category.name = req.name.trim().to_string();
        category.description = req.description.clone();
        Ok(category.clone())
    }

    pub fn delete_category(&self, id: Uuid) -> StoreResult<()> {
        let mut inventory = self.write()?;
        inventory.category(id).ok_or_else(|| not_found("category", id))?;

        if inventory.products.iter().any(|p| p.category_id == id) {
            return Err(StoreError::Conflict(
                "Category still has products".to_string(),
            ));
        }
        inventory.categories.retain(|c| c.id != id);
        Ok(())
    }

    // == Suppliers ==
    pub fn create_supplier(&self, req: &PartyRequest) -> StoreResult<Supplier> {
        check(req.validate())?;
        let mut inventory = self.write()?;

        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            phone: req.phone.clone(),
            address: req.address.clone(),
        };
        inventory.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn delete_supplier(&self, id: Uuid) -> StoreResult<()> {
        let mut inventory = self.write()?;
        inventory.supplier(id).ok_or_else(|| not_found("supplier", id))?;

        let supplies_products = inventory.products.iter().any(|p| p.supplier_id == Some(id));
        let has_purchases = inventory
            .transactions_of(TransactionKind::Purchase)
            .any(|t| t.party_id == id);
        if supplies_products || has_purchases {
            return Err(StoreError::Conflict(
                "Supplier is referenced by products or purchases".to_string(),
            ));
        }
        inventory.suppliers.retain(|s| s.id != id);
        Ok(())
    }

    // == Customers ==
    pub fn create_customer(&self, req: &PartyRequest) -> StoreResult<Customer> {
        check(req.validate())?;
        let mut inventory = self.write()?;

        let customer = Customer {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            phone: req.phone.clone(),
            address: req.address.clone(),
        };
        inventory.customers.push(customer.clone());
        Ok(customer)
    }

    pub fn delete_customer(&self, id: Uuid) -> StoreResult<()> {
        let mut inventory = self.write()?;
        inventory.customer(id).ok_or_else(|| not_found("customer", id))?;

        if inventory
            .transactions_of(TransactionKind::Sale)
            .any(|t| t.party_id == id)
        {
            return Err(StoreError::Conflict(
                "Customer has recorded sales".to_string(),
            ));
        }
        inventory.customers.retain(|c| c.id != id);
        Ok(())
    }

    // == Products ==
    pub fn create_product(&self, req: &ProductRequest) -> StoreResult<Product> {
        check(req.validate())?;
        let mut inventory = self.write()?;
        check_product_refs(&inventory, req)?;

        let product = Product {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            category_id: req.category_id,
            supplier_id: req.supplier_id,
            unit_price: req.unit_price,
            quantity: req.quantity,
            reorder_level: req.reorder_level,
        };
        inventory.products.push(product.clone());
        Ok(product)
    }

    /// Updates a product's details. Stock only changes through transactions.
    pub fn update_product(&self, id: Uuid, req: &ProductRequest) -> StoreResult<Product> {
        check(req.validate())?;
        let mut inventory = self.write()?;
        check_product_refs(&inventory, req)?;

        let product = inventory
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("product", id))?;
        product.name = req.name.trim().to_string();
        product.category_id = req.category_id;
        product.supplier_id = req.supplier_id;
        product.unit_price = req.unit_price;
        product.reorder_level = req.reorder_level;
        Ok(product.clone())
    }

    pub fn delete_product(&self, id: Uuid) -> StoreResult<()> {
        let mut inventory = self.write()?;
        inventory.product(id).ok_or_else(|| not_found("product", id))?;

        if inventory.transactions.iter().any(|t| t.product_id == id) {
            return Err(StoreError::Conflict(
                "Product has recorded transactions".to_string(),
            ));
        }
        inventory.products.retain(|p| p.id != id);
        Ok(())
    }

    // == Transactions ==
    /// Records stock bought from a supplier and adds it to the product.
    pub fn record_purchase(&self, req: &PurchaseRequest) -> StoreResult<Transaction> {
        check(req.validate())?;
        line_total(req.unit_price, req.quantity)?;
        let mut inventory = self.write()?;
        inventory
            .supplier(req.supplier_id)
            .ok_or_else(|| not_found("supplier", req.supplier_id))?;

        let product = product_mut(&mut inventory, req.product_id)?;
        product.quantity = product
            .quantity
            .checked_add(req.quantity)
            .ok_or_else(|| StoreError::Invalid("Stock quantity overflow".to_string()))?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            kind: TransactionKind::Purchase,
            product_id: req.product_id,
            party_id: req.supplier_id,
            quantity: req.quantity,
            unit_price: req.unit_price,
            recorded_at: Utc::now(),
        };
        inventory.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Records a sale at the product's current price and takes it out of stock.
    pub fn record_sale(&self, req: &SaleRequest) -> StoreResult<Transaction> {
        check(req.validate())?;
        let mut inventory = self.write()?;
        inventory
            .customer(req.customer_id)
            .ok_or_else(|| not_found("customer", req.customer_id))?;

        let product = product_mut(&mut inventory, req.product_id)?;
        line_total(product.unit_price, req.quantity)?;
        if product.quantity < req.quantity {
            return Err(StoreError::Conflict(format!(
                "Insufficient stock for '{}': {} available, {} requested",
                product.name, product.quantity, req.quantity
            )));
        }
        product.quantity -= req.quantity;
        let unit_price = product.unit_price;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            kind: TransactionKind::Sale,
            product_id: req.product_id,
            party_id: req.customer_id,
            quantity: req.quantity,
            unit_price,
            recorded_at: Utc::now(),
        };
        inventory.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Records goods returned against a sale and puts them back in stock.
    pub fn record_return(&self, req: &ReturnRequest) -> StoreResult<ProductReturn> {
        check(req.validate())?;
        let mut inventory = self.write()?;

        let sale = inventory
            .transaction(req.transaction_id)
            .ok_or_else(|| not_found("transaction", req.transaction_id))?
            .clone();
        if sale.kind != TransactionKind::Sale {
            return Err(StoreError::Invalid(
                "Only sales can be returned".to_string(),
            ));
        }

        let returnable = sale.quantity - inventory.returned_quantity(sale.id);
        if req.quantity > returnable {
            return Err(StoreError::Conflict(format!(
                "Only {} units of this sale can still be returned",
                returnable
            )));
        }

        let product = product_mut(&mut inventory, sale.product_id)?;
        product.quantity = product
            .quantity
            .checked_add(req.quantity)
            .ok_or_else(|| StoreError::Invalid("Stock quantity overflow".to_string()))?;

        let product_return = ProductReturn {
            id: Uuid::new_v4(),
            transaction_id: sale.id,
            product_id: sale.product_id,
            quantity: req.quantity,
            reason: req.reason.clone(),
            recorded_at: Utc::now(),
        };
        inventory.returns.push(product_return.clone());
        Ok(product_return)
    }
}

fn check_product_refs(inventory: &Inventory, req: &ProductRequest) -> StoreResult<()> {
    inventory
        .category(req.category_id)
        .ok_or_else(|| not_found("category", req.category_id))?;
    if let Some(supplier_id) = req.supplier_id {
        inventory
            .supplier(supplier_id)
            .ok_or_else(|| not_found("supplier", supplier_id))?;
    }
    Ok(())
}

fn product_mut(inventory: &mut Inventory, id: Uuid) -> StoreResult<&mut Product> {
    inventory
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found("product", id))
}

#[cfg(test)]
impl MemoryStore {
    /// Poisons the lock the way a panic during a write would.
    pub(crate) fn poison(&self) {
        let inner = Arc::clone(&self.inner);
        let _ = std::thread::spawn(move || {
            let _guard = inner.write();
            panic!("poisoning inventory lock");
        })
        .join();
    }
}
