//! A small populated store shared by inventory and view tests.

use crate::inventory::{Category, Customer, MemoryStore, Product, Supplier};
use crate::models::{CategoryRequest, PartyRequest, ProductRequest};

pub struct Fixture {
    pub store: MemoryStore,
    pub category: Category,
    pub supplier: Supplier,
    pub customer: Customer,
    pub product: Product,
}

/// One category, supplier, customer and a product with 10 units at 1.25.
pub fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let category = store
        .create_category(&CategoryRequest {
            name: "Hardware".to_string(),
            description: Some("Nuts and bolts".to_string()),
        })
        .unwrap();
    let supplier = store
        .create_supplier(&PartyRequest {
            name: "Acme".to_string(),
            phone: None,
            address: Some("1 Industrial Way".to_string()),
        })
        .unwrap();
    let customer = store
        .create_customer(&PartyRequest {
            name: "Jordan".to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
        })
        .unwrap();
    let product = store
        .create_product(&ProductRequest {
            name: "Bolt".to_string(),
            category_id: category.id,
            supplier_id: Some(supplier.id),
            unit_price: 125,
            quantity: 10,
            reorder_level: 2,
        })
        .unwrap();

    Fixture {
        store,
        category,
        supplier,
        customer,
        product,
    }
}
