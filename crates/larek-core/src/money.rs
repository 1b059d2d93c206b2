//! # Money Module
//!
//! Provides the `Money` type for prices and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The backend prices every item in whole "synapses":                    │
//! │    { "price": 750 }   { "price": 1450 }   { "price": null }            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer synapses                                         │
//! │    750 + 1450 = 2200, exactly, every time                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use larek_core::money::Money;
//!
//! let price = Money::from_synapses(750);
//! let total = price.checked_add(Money::from_synapses(1450)).unwrap();
//! assert_eq!(total.synapses(), 2200);
//! assert_eq!(total.to_string(), "2200");
//!
//! assert_eq!(Money::from_synapses(i64::MAX).checked_add(price), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in synapses, the storefront's only currency unit.
///
/// Serializes as a bare JSON number so it matches the backend's `price` and
/// `total` fields.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CatalogItem.price ──┬──► AppState::cart_total() ──► Order.total        │
/// │                      │                                                  │
/// │                      └──► "750 synapses" in card and basket views       │
/// │                                                                         │
/// │  OrderResult.total ──► "Charged 750 synapses" on the success view       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole synapses.
    #[inline]
    pub const fn from_synapses(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the amount in synapses.
    #[inline]
    pub const fn synapses(&self) -> i64 {
        self.0
    }

    /// Zero synapses.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative.
    ///
    /// Catalog prices are never negative; see [`crate::validation::validate_price`].
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, or `None` if the sum does not fit.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Money(sum)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display is the bare amount. Views append the configured currency label.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_synapses() {
        let money = Money::from_synapses(750);
        assert_eq!(money.synapses(), 750);
        assert_ne!(money, Money::zero());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_display_has_no_unit() {
        assert_eq!(Money::from_synapses(750).to_string(), "750");
        assert_eq!(Money::zero().to_string(), "0");
        assert_eq!(format!("{} credits", Money::from_synapses(5)), "5 credits");
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_synapses(1000);
        let b = Money::from_synapses(250);
        assert_eq!(a.checked_add(b), Some(Money::from_synapses(1250)));
        assert_eq!(a.checked_add(Money::zero()), Some(a));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::from_synapses(i64::MAX);
        assert_eq!(max.checked_add(Money::from_synapses(1)), None);
        assert_eq!(max.checked_add(Money::zero()), Some(max));
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Money::from_synapses(1450)).unwrap();
        assert_eq!(json, "1450");

        let parsed: Money = serde_json::from_str("2500").unwrap();
        assert_eq!(parsed.synapses(), 2500);
    }
}
