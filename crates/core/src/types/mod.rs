//! Core types for Catch of the Day.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod fish;
pub mod price;
pub mod status;
pub mod store;

pub use fish::{Fish, FishKey, Inventory, Order};
pub use price::{Price, format_money};
pub use status::FishStatus;
pub use store::{StoreId, StoreIdError};
