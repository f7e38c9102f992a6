//! Request and Response models for the inventory view API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CategoryRequest, InvalidateRequest, PartyRequest, PreloadRequest, ProductRequest,
    PurchaseRequest, ReturnRequest, SaleRequest, ViewQuery, MAX_UNIT_PRICE,
};
pub use responses::{
    DeleteResponse, HealthResponse, InvalidateResponse, PreloadResponse, StatsResponse,
    ViewResponse,
};
