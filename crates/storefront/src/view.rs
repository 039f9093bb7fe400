//! Immutable view-models handed to the rendering layer.
//!
//! The renderer never sees the container's mappings directly; it gets a
//! [`StoreView`] built from the current state and emits intents back.

use catch_of_the_day_core::{Fish, FishKey, FishStatus, Inventory, Order, StoreId, format_money};
use rust_decimal::Decimal;

use crate::sync::SyncStatus;

/// Everything the storefront screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreView {
    /// Store being shown.
    pub store_id: StoreId,
    /// Menu entries, in key order.
    pub fishes: Vec<FishView>,
    /// The customer's order.
    pub order: OrderSummary,
    /// Health of the remote binding; warn when unavailable.
    pub sync: SyncStatus,
}

impl StoreView {
    /// Build the view for a store's current state.
    #[must_use]
    pub fn build(
        store_id: &StoreId,
        fishes: &Inventory,
        order: &Order,
        sync: &SyncStatus,
    ) -> Self {
        Self {
            store_id: store_id.clone(),
            fishes: fishes.iter().map(FishView::from).collect(),
            order: OrderSummary::build(fishes, order),
            sync: sync.clone(),
        }
    }
}

/// One entry of the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FishView {
    /// Inventory key, used to order the fish.
    pub key: FishKey,
    /// Display name.
    pub name: String,
    /// Formatted price per pound (e.g. `$17.24`).
    pub price: String,
    /// Availability.
    pub status: FishStatus,
    /// Description, possibly empty.
    pub desc: String,
    /// Image URL, possibly empty.
    pub image: String,
    /// Whether the "add to order" action is enabled.
    pub orderable: bool,
}

impl From<(&FishKey, &Fish)> for FishView {
    fn from((key, fish): (&FishKey, &Fish)) -> Self {
        Self {
            key: key.clone(),
            name: fish.name.clone(),
            price: fish.price.to_string(),
            status: fish.status,
            desc: fish.desc.clone(),
            image: fish.image.clone(),
            orderable: fish.status.is_orderable(),
        }
    }
}

/// A line of the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLine {
    /// Orderable fish, counted in the total.
    Item {
        /// Ordered fish.
        key: FishKey,
        /// Fish name.
        name: String,
        /// Pounds ordered.
        quantity: u32,
        /// Price times quantity.
        line_total: Decimal,
    },
    /// Fish still listed but no longer available; excluded from the total.
    Unavailable {
        /// Ordered fish.
        key: FishKey,
        /// Fish name.
        name: String,
    },
    /// Ordered key with no matching fish (e.g. after inventory was replaced).
    Missing {
        /// Ordered key.
        key: FishKey,
    },
}

impl OrderLine {
    /// Key of the ordered fish.
    #[must_use]
    pub const fn key(&self) -> &FishKey {
        match self {
            Self::Item { key, .. } | Self::Unavailable { key, .. } | Self::Missing { key } => key,
        }
    }
}

impl std::fmt::Display for OrderLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item {
                name,
                quantity,
                line_total,
                ..
            } => write!(f, "{quantity} lbs {name} {}", format_money(*line_total)),
            Self::Unavailable { name, .. } => write!(f, "Sorry {name} is no longer available"),
            Self::Missing { .. } => write!(f, "Sorry fish is no longer available"),
        }
    }
}

/// The customer's order as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSummary {
    /// One line per ordered key, in key order.
    pub lines: Vec<OrderLine>,
    /// Sum of the `Item` lines.
    pub total: Decimal,
}

impl OrderSummary {
    /// Resolve every order entry against the inventory.
    #[must_use]
    pub fn build(fishes: &Inventory, order: &Order) -> Self {
        let lines: Vec<OrderLine> = order
            .iter()
            .map(|(key, &quantity)| match fishes.get(key) {
                Some(fish) if fish.status.is_orderable() => OrderLine::Item {
                    key: key.clone(),
                    name: fish.name.clone(),
                    quantity,
                    line_total: fish.price.times(quantity),
                },
                Some(fish) => OrderLine::Unavailable {
                    key: key.clone(),
                    name: fish.name.clone(),
                },
                None => OrderLine::Missing { key: key.clone() },
            })
            .collect();

        let total = lines
            .iter()
            .map(|line| match line {
                OrderLine::Item { line_total, .. } => *line_total,
                _ => Decimal::ZERO,
            })
            .sum();

        Self { lines, total }
    }

    /// Formatted order total.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_money(self.total)
    }

    /// Whether nothing has been ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
