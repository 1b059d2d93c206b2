//! # Checkout Phase Machine
//!
//! The storefront's checkout flow as an explicit state machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Phases                                   │
//! │                                                                         │
//! │   ┌─────────┐  basket   ┌──────────┐  order   ┌─────────────┐          │
//! │   │ Catalog │──────────►│ CartOpen │─────────►│ PaymentStep │          │
//! │   └─────────┘           └──────────┘ (cart≠∅) └──────┬──────┘          │
//! │        ▲                                             │ next (valid)    │
//! │        │ close                                       ▼                  │
//! │        │ (any phase but             ┌──────────────────────┐            │
//! │        │  Submitting)               │     ContactsStep     │◄──┐        │
//! │        │                            └──────────┬───────────┘   │ fail   │
//! │        │                                       │ submit (valid)│        │
//! │   ┌────┴──────┐      success      ┌────────────▼─────┐         │        │
//! │   │ Confirmed │◄──────────────────│    Submitting    │─────────┘        │
//! │   └───────────┘                   └──────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only knows the graph. Guards that need state (cart not empty,
//! step valid) are checked by [`crate::store::AppState::transition`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Where the user is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Browsing the catalog (a preview modal may be open).
    #[default]
    Catalog,
    /// Basket modal open.
    CartOpen,
    /// Payment method and address form.
    PaymentStep,
    /// Email and phone form.
    ContactsStep,
    /// Order sent, waiting for the backend.
    Submitting,
    /// Backend accepted the order.
    Confirmed,
}

impl CheckoutPhase {
    /// Returns true if the graph has an edge from `self` to `next`.
    ///
    /// Staying in the same phase is not an edge; callers treat it as a no-op.
    pub fn can_transition_to(&self, next: CheckoutPhase) -> bool {
        use CheckoutPhase::*;

        match (self, next) {
            (Catalog, CartOpen) => true,
            (CartOpen, PaymentStep) => true,
            (PaymentStep, ContactsStep) => true,
            (ContactsStep, Submitting) => true,
            (Submitting, Confirmed) | (Submitting, ContactsStep) => true,
            // Closing the modal abandons the flow, except mid-request
            (Submitting, Catalog) => false,
            (from, Catalog) => *from != Catalog,
            _ => false,
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutPhase::Catalog => "catalog",
            CheckoutPhase::CartOpen => "cart open",
            CheckoutPhase::PaymentStep => "payment step",
            CheckoutPhase::ContactsStep => "contacts step",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::CheckoutPhase::*;
    use super::*;

    const ALL: [CheckoutPhase; 6] = [
        Catalog,
        CartOpen,
        PaymentStep,
        ContactsStep,
        Submitting,
        Confirmed,
    ];

    #[test]
    fn test_happy_path() {
        let path = [Catalog, CartOpen, PaymentStep, ContactsStep, Submitting, Confirmed, Catalog];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_no_skipping_steps() {
        assert!(!Catalog.can_transition_to(PaymentStep));
        assert!(!Catalog.can_transition_to(ContactsStep));
        assert!(!CartOpen.can_transition_to(ContactsStep));
        assert!(!PaymentStep.can_transition_to(Submitting));
        assert!(!ContactsStep.can_transition_to(Confirmed));
    }

    #[test]
    fn test_close_allowed_except_while_submitting() {
        for phase in ALL {
            let expected = !matches!(phase, Catalog | Submitting);
            assert_eq!(phase.can_transition_to(Catalog), expected, "{phase}");
        }
    }

    #[test]
    fn test_failed_submission_returns_to_contacts() {
        assert!(Submitting.can_transition_to(ContactsStep));
        assert!(!Confirmed.can_transition_to(Submitting));
    }

    #[test]
    fn test_default_is_catalog() {
        assert_eq!(CheckoutPhase::default(), Catalog);
    }
}
