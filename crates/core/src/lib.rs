//! Catch of the Day Core - Shared domain types.
//!
//! This crate provides the types shared by every Catch of the Day component:
//! - `storefront` - Store state container, persistence ports and adapters
//! - `cli` - The `cotd` shell that hosts a store session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no network clients, no
//! clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Store identifiers, fish records, prices and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
