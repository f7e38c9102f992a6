//! Request DTOs for the inventory view API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use uuid::Uuid;

/// Maximum accepted length of a name field
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum accepted unit price in cents (10 million)
pub const MAX_UNIT_PRICE: u64 = 1_000_000_000;

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

fn validate_price(unit_price: u64) -> Option<String> {
    if unit_price > MAX_UNIT_PRICE {
        return Some(format!(
            "Unit price exceeds maximum of {} cents",
            MAX_UNIT_PRICE
        ));
    }
    None
}

fn validate_quantity(quantity: u32) -> Option<String> {
    if quantity == 0 {
        return Some("Quantity must be greater than zero".to_string());
    }
    None
}

/// Query string of `GET /views/:key`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    /// Case-insensitive substring rows must contain
    #[serde(default)]
    pub q: Option<String>,
}

/// Request body for `POST /views/preload`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreloadRequest {
    /// Views to build; all known views when absent
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}

/// Request body for `POST /views/invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub keys: Vec<String>,
}

impl InvalidateRequest {
    pub fn validate(&self) -> Option<String> {
        if self.keys.iter().any(|key| key.is_empty()) {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for creating or updating a category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
    }
}

/// Request body for creating a supplier or a customer
#[derive(Debug, Clone, Deserialize)]
pub struct PartyRequest {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl PartyRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_name(&self.name) {
            return Some(error);
        }
        match &self.phone {
            Some(phone) if !phone.chars().all(|c| c.is_ascii_digit() || "+-() ".contains(c)) => {
                Some("Phone may only contain digits, spaces and +-()".to_string())
            }
            _ => None,
        }
    }
}

/// Request body for creating or updating a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    /// Price in cents
    pub unit_price: u64,
    /// Opening stock; ignored on update
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub reorder_level: u32,
}

impl ProductRequest {
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name).or_else(|| validate_price(self.unit_price))
    }
}

/// Request body for `POST /purchases`
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub quantity: u32,
    /// Price paid per unit in cents
    pub unit_price: u64,
}

impl PurchaseRequest {
    pub fn validate(&self) -> Option<String> {
        validate_quantity(self.quantity).or_else(|| validate_price(self.unit_price))
    }
}

/// Request body for `POST /sales`
#[derive(Debug, Clone, Deserialize)]
pub struct SaleRequest {
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub quantity: u32,
}

impl SaleRequest {
    pub fn validate(&self) -> Option<String> {
        validate_quantity(self.quantity)
    }
}

/// Request body for `POST /returns`
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub transaction_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ReturnRequest {
    pub fn validate(&self) -> Option<String> {
        validate_quantity(self.quantity)
    }
}
