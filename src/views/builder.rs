//! Inventory View Builder
//!
//! Renders each catalog view from a snapshot of the inventory store.

use std::collections::HashMap;

use uuid::Uuid;

use crate::cache::{BuildError, ViewBuilder};
use crate::inventory::{Inventory, MemoryStore, Transaction, TransactionKind};
use crate::views::catalog::{
    CATEGORIES, CUSTOMERS, DASHBOARD, PURCHASES, REPORTS, RETURNS, SALES, STOCK, SUPPLIERS,
};
use crate::views::{format_price, RenderedView};

/// Builds [`RenderedView`]s from the inventory store.
#[derive(Debug, Clone)]
pub struct InventoryViewBuilder {
    store: MemoryStore,
}

impl InventoryViewBuilder {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl ViewBuilder<RenderedView> for InventoryViewBuilder {
    fn build(&self, key: &str) -> Result<RenderedView, BuildError> {
        let render: fn(&Inventory) -> Rendered = match key {
            DASHBOARD => dashboard,
            STOCK => stock,
            CATEGORIES => categories,
            SUPPLIERS => suppliers,
            CUSTOMERS => customers,
            PURCHASES => purchases,
            SALES => sales,
            RETURNS => returns,
            REPORTS => reports,
            _ => return Err(BuildError::NotFound(key.to_string())),
        };

        let inventory = self
            .store
            .snapshot()
            .map_err(|err| BuildError::failed(key, err.to_string()))?;
        render(&inventory)
            .map_err(|AmountOverflow| BuildError::failed(key, "money amount is too large"))
    }
}

/// A money total that does not fit in a `u64`.
#[derive(Debug)]
struct AmountOverflow;

type Rendered = Result<RenderedView, AmountOverflow>;

fn sum_amounts(amounts: impl IntoIterator<Item = Option<u64>>) -> Result<u64, AmountOverflow> {
    amounts.into_iter().try_fold(0u64, |sum, amount| {
        amount
            .and_then(|amount| sum.checked_add(amount))
            .ok_or(AmountOverflow)
    })
}

fn text(value: impl ToString) -> String {
    value.to_string()
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn product_name(inventory: &Inventory, id: Uuid) -> String {
    inventory
        .product(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "(deleted)".to_string())
}

fn dashboard(inventory: &Inventory) -> Rendered {
    let units: u64 = inventory.products.iter().map(|p| u64::from(p.quantity)).sum();
    let low_stock = inventory.products.iter().filter(|p| p.is_low_stock()).count();
    let revenue = sum_amounts(
        inventory
            .transactions_of(TransactionKind::Sale)
            .map(Transaction::total),
    )?;
    let spent = sum_amounts(
        inventory
            .transactions_of(TransactionKind::Purchase)
            .map(Transaction::total),
    )?;

    let metrics = [
        ("Products", text(inventory.products.len())),
        ("Units in stock", text(units)),
        ("Low stock items", text(low_stock)),
        ("Categories", text(inventory.categories.len())),
        ("Suppliers", text(inventory.suppliers.len())),
        ("Customers", text(inventory.customers.len())),
        ("Sales", text(inventory.transactions_of(TransactionKind::Sale).count())),
        ("Purchases", text(inventory.transactions_of(TransactionKind::Purchase).count())),
        ("Returns", text(inventory.returns.len())),
        ("Revenue", format_price(revenue)),
        ("Purchase spend", format_price(spent)),
    ];

    let rows = metrics
        .into_iter()
        .map(|(name, value)| vec![name.to_string(), value])
        .collect();
    Ok(RenderedView::new(
        DASHBOARD,
        "Dashboard",
        &["Metric", "Value"],
        rows,
    ))
}

fn stock(inventory: &Inventory) -> Rendered {
    let rows = inventory
        .products
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                inventory
                    .category(p.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                p.supplier_id
                    .and_then(|id| inventory.supplier(id))
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                format_price(p.unit_price),
                text(p.quantity),
                (if p.is_low_stock() { "LOW" } else { "OK" }).to_string(),
            ]
        })
        .collect();

    Ok(RenderedView::new(
        STOCK,
        "Stock",
        &["Product", "Category", "Supplier", "Unit price", "Quantity", "Status"],
        rows,
    ))
}

fn categories(inventory: &Inventory) -> Rendered {
    let rows = inventory
        .categories
        .iter()
        .map(|c| {
            let products = inventory
                .products
                .iter()
                .filter(|p| p.category_id == c.id)
                .count();
            vec![c.name.clone(), optional(&c.description), text(products)]
        })
        .collect();

    Ok(RenderedView::new(
        CATEGORIES,
        "Categories",
        &["Name", "Description", "Products"],
        rows,
    ))
}

fn suppliers(inventory: &Inventory) -> Rendered {
    let rows = inventory
        .suppliers
        .iter()
        .map(|s| vec![s.name.clone(), optional(&s.phone), optional(&s.address)])
        .collect();

    Ok(RenderedView::new(
        SUPPLIERS,
        "Suppliers",
        &["Name", "Phone", "Address"],
        rows,
    ))
}

fn customers(inventory: &Inventory) -> Rendered {
    let rows = inventory
        .customers
        .iter()
        .map(|c| vec![c.name.clone(), optional(&c.phone), optional(&c.address)])
        .collect();

    Ok(RenderedView::new(
        CUSTOMERS,
        "Customers",
        &["Name", "Phone", "Address"],
        rows,
    ))
}

fn transaction_rows(
    inventory: &Inventory,
    kind: TransactionKind,
) -> Result<Vec<Vec<String>>, AmountOverflow> {
    inventory
        .transactions_of(kind)
        .map(|t| {
            let total = t.total().ok_or(AmountOverflow)?;
            let party = match kind {
                TransactionKind::Purchase => inventory.supplier(t.party_id).map(|s| s.name.clone()),
                TransactionKind::Sale => inventory.customer(t.party_id).map(|c| c.name.clone()),
            };
            Ok(vec![
                date(&t.recorded_at),
                product_name(inventory, t.product_id),
                party.unwrap_or_else(|| "(deleted)".to_string()),
                text(t.quantity),
                format_price(t.unit_price),
                format_price(total),
            ])
        })
        .collect()
}

fn purchases(inventory: &Inventory) -> Rendered {
    Ok(RenderedView::new(
        PURCHASES,
        "Purchases",
        &["Date", "Product", "Supplier", "Quantity", "Unit price", "Total"],
        transaction_rows(inventory, TransactionKind::Purchase)?,
    ))
}

fn sales(inventory: &Inventory) -> Rendered {
    Ok(RenderedView::new(
        SALES,
        "Sales",
        &["Date", "Product", "Customer", "Quantity", "Unit price", "Total"],
        transaction_rows(inventory, TransactionKind::Sale)?,
    ))
}

fn returns(inventory: &Inventory) -> Rendered {
    let rows = inventory
        .returns
        .iter()
        .map(|r| {
            vec![
                date(&r.recorded_at),
                product_name(inventory, r.product_id),
                text(r.quantity),
                optional(&r.reason),
            ]
        })
        .collect();

    Ok(RenderedView::new(
        RETURNS,
        "Returns",
        &["Date", "Product", "Quantity", "Reason"],
        rows,
    ))
}

/// Per-product sales summary: units sold, units returned, net revenue.
fn reports(inventory: &Inventory) -> Rendered {
    let mut sold: HashMap<Uuid, (u64, u64)> = HashMap::new();
    for sale in inventory.transactions_of(TransactionKind::Sale) {
        let line = sold.entry(sale.product_id).or_default();
        line.0 += u64::from(sale.quantity);
        line.1 = sum_amounts([Some(line.1), sale.total()])?;
    }

    let mut returned: HashMap<Uuid, (u64, u64)> = HashMap::new();
    for product_return in &inventory.returns {
        let refund = match inventory.transaction(product_return.transaction_id) {
            Some(t) => t.unit_price.checked_mul(u64::from(product_return.quantity)),
            None => Some(0),
        };
        let line = returned.entry(product_return.product_id).or_default();
        line.0 += u64::from(product_return.quantity);
        line.1 = sum_amounts([Some(line.1), refund])?;
    }

    let rows = inventory
        .products
        .iter()
        .filter_map(|p| {
            let (units_sold, gross) = sold.get(&p.id).copied()?;
            let (units_returned, refunds) = returned.get(&p.id).copied().unwrap_or_default();
            Some(vec![
                p.name.clone(),
                text(units_sold),
                text(units_returned),
                format_price(gross.saturating_sub(refunds)),
            ])
        })
        .collect();

    Ok(RenderedView::new(
        REPORTS,
        "Sales report",
        &["Product", "Units sold", "Units returned", "Net revenue"],
        rows,
    ))
}
