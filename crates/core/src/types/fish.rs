//! Fish records and the two store mappings built from them.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::status::FishStatus;

/// Key of a fish within a store's inventory (e.g. `fish-1700000000000`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FishKey(String);

impl FishKey {
    /// Create a key from any string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FishKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FishKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for FishKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for FishKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fish {
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Availability.
    pub status: FishStatus,
    /// Free-form description.
    #[serde(default)]
    pub desc: String,
    /// Image URL or path.
    #[serde(default)]
    pub image: String,
}

impl Fish {
    /// Create a fish with an empty description and image.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price, status: FishStatus) -> Self {
        Self {
            name: name.into(),
            price,
            status,
            desc: String::new(),
            image: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// A store's inventory: fish key to fish record.
pub type Inventory = BTreeMap<FishKey, Fish>;

/// A customer's order: fish key to quantity (always at least 1).
pub type Order = BTreeMap<FishKey, u32>;
