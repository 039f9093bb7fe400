//! Catch of the Day Storefront library.
//!
//! Holds the store state container and everything it talks to:
//!
//! - [`state`] - [`StoreStateContainer`](state::StoreStateContainer), owner of
//!   a store's inventory and order
//! - [`sync`] - remote inventory binding port and adapters
//! - [`cache`] - local order cache port and adapters
//! - [`view`] - immutable view-models for the rendering layer
//! - [`keys`] - fish key generation
//! - [`samples`] - demo inventory
//! - [`picker`] - store name suggestions
//! - [`config`] - environment configuration
//! - [`session`] - builds a container from configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod picker;
pub mod samples;
pub mod session;
pub mod state;
pub mod sync;
pub mod view;

pub use error::{Result, StoreError};
pub use state::StoreStateContainer;
