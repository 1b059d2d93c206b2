//! # Error Types
//!
//! Domain-specific error types for larek-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larek-core errors (this file)                                         │
//! │  ├── CoreError        - Store, bus and checkout failures               │
//! │  └── ValidationError  - Disallowed input values                        │
//! │                                                                         │
//! │  larek-api errors (separate crate)                                     │
//! │  └── ApiError         - Network / backend failures                     │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── AppError         - What the terminal session reports              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! A checkout form with missing fields is normal flow. Those messages live
//! in [`crate::validation::FormErrors`] and are published as events, never
//! returned as `Err`.

use thiserror::Error;

use crate::checkout::CheckoutPhase;
use crate::types::{CheckoutStep, OrderField};

// =============================================================================
// Core Error
// =============================================================================

/// Store and event-coordination errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item id has no catalog entry.
    ///
    /// ## When This Occurs
    /// - Selecting or adding an item that is not in the current catalog
    /// - Computing a cart total after catalog and cart desynchronised
    ///
    /// The second case is a defect: it propagates to the publisher instead
    /// of producing a partial total.
    #[error("Item not found in catalog: {0}")]
    ItemNotFound(String),

    /// A field was written through the wrong checkout step.
    #[error("Field {field} does not belong to the {step} step")]
    FieldNotInStep {
        field: OrderField,
        step: CheckoutStep,
    },

    /// A checkout phase change the state machine does not allow.
    ///
    /// ## User Workflow
    /// ```text
    /// Catalog ──► CartOpen ──► PaymentStep ──► ContactsStep ──► Submitting
    ///                                                             │
    ///                                      Confirmed ◄────────────┘
    ///
    /// Catalog ──► ContactsStep   ✗ InvalidTransition
    /// ```
    #[error("Cannot move checkout from {from} to {to}")]
    InvalidTransition {
        from: CheckoutPhase,
        to: CheckoutPhase,
    },

    /// A step was submitted while its form still has errors.
    #[error("The {0} step is incomplete")]
    StepIncomplete(CheckoutStep),

    /// Checkout started with nothing in the cart.
    #[error("Basket is empty")]
    EmptyCart,

    /// The cart holds items without a price.
    #[error("Some basket items are not for sale: {}", ids.join(", "))]
    NotOrderable { ids: Vec<String> },

    /// The cart total does not fit in [`crate::money::Money`].
    #[error("Basket total is too large to represent")]
    TotalOverflow,

    /// A presentation or orchestration handler failed during dispatch.
    #[error("Handler for {event} failed: {message}")]
    Handler { event: String, message: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate catalog id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound("a".to_string());
        assert_eq!(err.to_string(), "Item not found in catalog: a");

        let err = CoreError::NotOrderable {
            ids: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(err.to_string(), "Some basket items are not for sale: b, c");

        let err = CoreError::InvalidTransition {
            from: CheckoutPhase::Catalog,
            to: CheckoutPhase::Submitting,
        };
        assert_eq!(err.to_string(), "Cannot move checkout from catalog to submitting");

        assert_eq!(
            CoreError::TotalOverflow.to_string(),
            "Basket total is too large to represent"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "address".to_string(),
        };
        assert_eq!(err.to_string(), "address is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
