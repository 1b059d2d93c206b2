//! # Validation Module
//!
//! Checkout form validation and catalog sanity checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Form Validation                           │
//! │                                                                         │
//! │  User edits one field                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppState::set_field(step, field, value)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_step(draft, step) ← THIS MODULE                              │
//! │       │   checks EVERY field of the step, not just the edited one      │
//! │       │                                                                 │
//! │       ├── missing fields → FormErrors { field: message, ... }          │
//! │       │                                                                 │
//! │       └── nothing missing → FormErrors {} (step is ready)              │
//! │                                                                         │
//! │  Presence only: no email or phone shape checks.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CatalogItem, CheckoutStep, OrderDraft, OrderField};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Per-field error messages for one checkout step.
///
/// Ordered by [`OrderField`]: payment, address, phone, email.
pub type FormErrors = BTreeMap<OrderField, String>;

// =============================================================================
// Form Validators
// =============================================================================

/// Message shown when a field of a checkout form is left empty.
pub fn missing_field_message(field: OrderField) -> &'static str {
    match field {
        OrderField::Payment => "Payment method must be selected",
        OrderField::Address => "Address is required",
        OrderField::Email => "Email is required",
        OrderField::Phone => "Phone number is required",
    }
}

/// Validates every field of `step` against the draft.
///
/// Whitespace-only text counts as empty.
///
/// ## Example
/// ```rust
/// use larek_core::types::{CheckoutStep, OrderDraft, OrderField};
/// use larek_core::validation::validate_step;
///
/// let mut draft = OrderDraft::default();
/// draft.address = "Main St".to_string();
///
/// let errors = validate_step(&draft, CheckoutStep::Payment);
/// assert!(errors.contains_key(&OrderField::Payment));
/// assert!(!errors.contains_key(&OrderField::Address));
/// ```
pub fn validate_step(draft: &OrderDraft, step: CheckoutStep) -> FormErrors {
    step.fields()
        .iter()
        .filter(|field| draft.value(**field).trim().is_empty())
        .map(|field| (*field, missing_field_message(*field).to_string()))
        .collect()
}

/// Joins a step's messages the way the forms display them, in
/// [`OrderField`] order.
pub fn combined_message(errors: &FormErrors) -> String {
    errors.values().map(String::as_str).collect::<Vec<_>>().join("; ")
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative
/// - `None` (not for sale) is allowed
pub fn validate_price(price: Option<Money>) -> ValidationResult<()> {
    match price {
        Some(price) if price.is_negative() => Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates a freshly fetched catalog before it replaces the old one.
///
/// ## Rules
/// - Every id is non-empty and unique
/// - Every price is non-negative or absent
pub fn validate_catalog(items: &[CatalogItem]) -> ValidationResult<()> {
    let mut seen = std::collections::HashSet::new();

    for item in items {
        if item.id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.clone(),
            });
        }

        validate_price(item.price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
