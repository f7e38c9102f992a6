//! Views Module
//!
//! The inventory views served through the cache: their names, the rendered
//! table type, and the builder that renders them.

mod builder;
pub mod catalog;
mod view;

pub use builder::InventoryViewBuilder;
pub use catalog::{inventory_views, INVENTORY_VIEWS};
pub use view::{format_price, RenderedView};
