//! Inventory Records
//!
//! The persisted domain data the views are rendered from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A stocked item. Prices are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub unit_price: u64,
    pub quantity: u32,
    /// Stock at or below this level is reported as low
    pub reorder_level: u32,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stock bought from a supplier
    Purchase,
    /// Stock sold to a customer
    Sale,
}

/// A purchase or a sale. `party_id` is the supplier or the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub product_id: Uuid,
    pub party_id: Uuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Price of the whole transaction, `None` if it does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Goods brought back against a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReturn {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub reason: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// The full data set, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub transactions: Vec<Transaction>,
    pub returns: Vec<ProductReturn>,
}

impl Inventory {
    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn supplier(&self, id: Uuid) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Units already returned against the sale `transaction_id`.
    pub fn returned_quantity(&self, transaction_id: Uuid) -> u32 {
        self.returns
            .iter()
            .filter(|r| r.transaction_id == transaction_id)
            .map(|r| r.quantity)
            .sum()
    }

    pub fn transactions_of(&self, kind: TransactionKind) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.kind == kind)
    }
}
