//! Fish availability status.

use serde::{Deserialize, Serialize};

/// Availability of a fish in the store's inventory.
///
/// Serialized in kebab-case (`"available"`, `"unavailable"`, `"sold-out"`),
/// which is the representation stored remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FishStatus {
    /// Fresh and ready to order.
    #[default]
    Available,
    /// Temporarily off the menu.
    Unavailable,
    /// Out of stock for the day.
    SoldOut,
}

impl FishStatus {
    /// Whether customers can add this fish to their order.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Fresh!",
            Self::Unavailable => "Unavailable",
            Self::SoldOut => "Sold Out!",
        }
    }
}

impl std::fmt::Display for FishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::SoldOut => write!(f, "sold-out"),
        }
    }
}

impl std::str::FromStr for FishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "sold-out" => Ok(Self::SoldOut),
            _ => Err(format!("invalid fish status: {s}")),
        }
    }
}
