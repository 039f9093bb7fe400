//! Type-safe price representation.
//!
//! Prices travel as an integer number of cents (`"price": 1724`), the
//! representation stored remotely. Arithmetic and display go through
//! [`rust_decimal::Decimal`] so totals never pick up floating point error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Create a price from an amount in cents.
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> u32 {
        self.0
    }

    /// Amount in the currency's standard unit (e.g. dollars, not cents).
    #[must_use]
    pub fn amount(self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }

    /// Total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.amount() * Decimal::from(quantity)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_money(self.amount()))
    }
}

/// Format a decimal amount for display (e.g. `$17.24`).
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${amount:.2}")
}
