//! View Catalog
//!
//! Names of every view the service can render.

pub const DASHBOARD: &str = "dashboard";
pub const STOCK: &str = "stock";
pub const CATEGORIES: &str = "categories";
pub const SUPPLIERS: &str = "suppliers";
pub const CUSTOMERS: &str = "customers";
pub const PURCHASES: &str = "purchases";
pub const SALES: &str = "sales";
pub const RETURNS: &str = "returns";
pub const REPORTS: &str = "reports";

/// Every view rendered from inventory data.
///
/// This is both the default preload list and the set invalidated after any
/// inventory mutation.
pub const INVENTORY_VIEWS: [&str; 9] = [
    DASHBOARD, STOCK, CATEGORIES, SUPPLIERS, CUSTOMERS, PURCHASES, SALES, RETURNS, REPORTS,
];

/// [`INVENTORY_VIEWS`] as owned keys.
pub fn inventory_views() -> Vec<String> {
    INVENTORY_VIEWS.iter().map(|key| key.to_string()).collect()
}
