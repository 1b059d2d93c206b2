//! # Application State Store
//!
//! Single owner of the storefront's mutable state. Every mutator updates
//! state under a short-lived lock, releases it, then publishes the matching
//! change event.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppState                                       │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────────────────┐   │
//! │  │ catalog       │  │ cart          │  │ draft                     │   │
//! │  │ Vec<Item>     │◄─│ Vec<Item>     │  │ payment/address/email/... │   │
//! │  │ (replaced     │  │ (ids ⊆        │  ├───────────────────────────┤   │
//! │  │  wholesale)   │  │  catalog ids) │  │ errors[step] → FormErrors │   │
//! │  └───────────────┘  └───────────────┘  └───────────────────────────┘   │
//! │  preview: Option<id>          phase: CheckoutPhase                      │
//! │                                                                         │
//! │  mutate ──► drop lock ──► bus.publish(change event)                     │
//! │                              │                                          │
//! │                              └─► handlers may call back into AppState  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views never write here; they publish intents and orchestration calls
//! the mutators.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::bus::EventBus;
use crate::checkout::CheckoutPhase;
use crate::error::{CoreError, CoreResult};
use crate::events::AppEvent;
use crate::money::Money;
use crate::types::{CatalogItem, CheckoutStep, Order, OrderDraft, OrderField, PaymentMethod};
use crate::validation::{validate_catalog, validate_step, FormErrors};

#[derive(Debug, Default)]
struct StoreInner {
    catalog: Vec<CatalogItem>,
    cart: Vec<CatalogItem>,
    draft: OrderDraft,
    errors: BTreeMap<CheckoutStep, FormErrors>,
    preview: Option<String>,
    phase: CheckoutPhase,
}

impl StoreInner {
    fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    fn is_valid(&self, step: CheckoutStep) -> bool {
        validate_step(&self.draft, step).is_empty()
    }
}

/// The application state store.
///
/// Shared as `Arc<AppState>` between orchestration handlers.
#[derive(Debug)]
pub struct AppState {
    bus: Arc<EventBus>,
    inner: RwLock<StoreInner>,
}

impl AppState {
    /// Creates an empty store that publishes on `bus`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// The bus this store publishes on.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replaces the catalog and re-syncs the cart against it.
    ///
    /// Cart entries whose id vanished are dropped; the rest take the new
    /// record. A preview pointing at a vanished id is cleared.
    ///
    /// ## Events
    /// `CatalogChanged`, then `CartChanged` if the cart lost entries.
    pub fn set_catalog(&self, items: Vec<CatalogItem>) -> CoreResult<()> {
        validate_catalog(&items)?;

        let (catalog, pruned_cart) = {
            let mut inner = self.inner.write();
            inner.catalog = items;

            let before = inner.cart.len();
            let synced: Vec<CatalogItem> = inner
                .cart
                .iter()
                .filter_map(|entry| inner.find(&entry.id).cloned())
                .collect();
            inner.cart = synced;

            let preview_gone = inner
                .preview
                .as_deref()
                .is_some_and(|id| inner.find(id).is_none());
            if preview_gone {
                inner.preview = None;
            }

            let pruned = (inner.cart.len() != before).then(|| inner.cart.clone());
            (inner.catalog.clone(), pruned)
        };

        debug!(items = catalog.len(), "Catalog replaced");
        self.bus.publish(AppEvent::CatalogChanged { catalog })?;

        if let Some(cart) = pruned_cart {
            debug!(remaining = cart.len(), "Cart pruned after catalog change");
            self.bus.publish(AppEvent::CartChanged(cart))?;
        }

        Ok(())
    }

    /// Selects the item shown in the detail view.
    pub fn set_preview(&self, id: &str) -> CoreResult<()> {
        let item = {
            let mut inner = self.inner.write();
            let item = inner
                .find(id)
                .cloned()
                .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
            inner.preview = Some(item.id.clone());
            item
        };

        debug!(id = %item.id, "Preview selected");
        self.bus.publish(AppEvent::PreviewChanged(item))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a catalog item to the cart. Adding a present id changes nothing
    /// but still publishes `CartChanged`.
    pub fn add_to_cart(&self, id: &str) -> CoreResult<()> {
        let cart = {
            let mut inner = self.inner.write();
            let item = inner
                .find(id)
                .cloned()
                .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
            if !inner.cart.iter().any(|entry| entry.id == item.id) {
                inner.cart.push(item);
            }
            inner.cart.clone()
        };

        debug!(id, size = cart.len(), "Added to cart");
        self.bus.publish(AppEvent::CartChanged(cart))
    }

    /// Removes an item from the cart if present. Always publishes
    /// `CartChanged`.
    pub fn remove_from_cart(&self, id: &str) -> CoreResult<()> {
        let cart = {
            let mut inner = self.inner.write();
            inner.cart.retain(|entry| entry.id != id);
            inner.cart.clone()
        };

        debug!(id, size = cart.len(), "Removed from cart");
        self.bus.publish(AppEvent::CartChanged(cart))
    }

    /// Empties the cart.
    ///
    /// ## Events
    /// `CounterChanged(0)`, then `CartChanged` with an empty list.
    pub fn clear_cart(&self) -> CoreResult<()> {
        self.inner.write().cart.clear();

        debug!("Cart cleared");
        self.bus.publish(AppEvent::CounterChanged(0))?;
        self.bus.publish(AppEvent::CartChanged(Vec::new()))
    }

    pub fn is_in_cart(&self, id: &str) -> bool {
        self.inner.read().cart.iter().any(|entry| entry.id == id)
    }

    /// Sum of current catalog prices for the ids in the cart.
    ///
    /// Priceless items count as zero.
    ///
    /// ## Errors
    /// - `ItemNotFound` if a cart id has no catalog entry
    /// - `TotalOverflow` if the prices do not fit in one `Money`
    ///
    /// No partial total is ever returned.
    pub fn cart_total(&self) -> CoreResult<Money> {
        let inner = self.inner.read();
        inner.cart.iter().try_fold(Money::zero(), |total, entry| {
            let price = inner
                .find(&entry.id)
                .map(CatalogItem::price_or_zero)
                .ok_or_else(|| CoreError::ItemNotFound(entry.id.clone()))?;
            total.checked_add(price).ok_or(CoreError::TotalOverflow)
        })
    }

    // =========================================================================
    // Order Draft
    // =========================================================================

    /// Writes one checkout field and re-validates its whole step.
    ///
    /// An empty `payment` value unsets the method.
    ///
    /// ## Events
    /// `StepReady(step)` if the step just became valid, then always
    /// `FormErrorsChanged { step, errors }`.
    ///
    /// ## Errors
    /// - `FieldNotInStep` if `field` is edited on the other step
    /// - `Validation` if `payment` is not `card` or `cash`
    pub fn set_field(&self, step: CheckoutStep, field: OrderField, value: &str) -> CoreResult<()> {
        if field.step() != step {
            return Err(CoreError::FieldNotInStep { field, step });
        }

        let payment = match field {
            OrderField::Payment if value.trim().is_empty() => None,
            OrderField::Payment => Some(value.parse::<PaymentMethod>()?),
            _ => None,
        };

        let (became_ready, errors) = {
            let mut inner = self.inner.write();
            let was_valid = inner.is_valid(step);

            match field {
                OrderField::Payment => inner.draft.payment = payment,
                OrderField::Address => inner.draft.address = value.to_string(),
                OrderField::Email => inner.draft.email = value.to_string(),
                OrderField::Phone => inner.draft.phone = value.to_string(),
            }

            let errors = validate_step(&inner.draft, step);
            inner.errors.insert(step, errors.clone());
            (!was_valid && errors.is_empty(), errors)
        };

        debug!(%step, %field, errors = errors.len(), "Order field updated");

        if became_ready {
            self.bus.publish(AppEvent::StepReady(step))?;
        }
        self.bus.publish(AppEvent::FormErrorsChanged { step, errors })
    }

    /// Returns the draft to empty and forgets all form errors.
    pub fn reset_order_draft(&self) -> CoreResult<()> {
        let draft = {
            let mut inner = self.inner.write();
            inner.draft = OrderDraft::default();
            inner.errors.clear();
            inner.draft.clone()
        };

        debug!("Order draft reset");
        self.bus.publish(AppEvent::OrderChanged(draft))
    }

    /// Assembles the `POST /order` payload from the draft and the cart.
    ///
    /// ## Errors
    /// Checked in this order:
    /// - `EmptyCart`
    /// - `NotOrderable { ids }` if any cart item has no price
    /// - `StepIncomplete(step)` for the first invalid step
    pub fn build_order(&self) -> CoreResult<Order> {
        let (draft, items) = {
            let inner = self.inner.read();

            if inner.cart.is_empty() {
                return Err(CoreError::EmptyCart);
            }

            let priceless: Vec<String> = inner
                .cart
                .iter()
                .filter(|entry| entry.is_priceless())
                .map(|entry| entry.id.clone())
                .collect();
            if !priceless.is_empty() {
                return Err(CoreError::NotOrderable { ids: priceless });
            }

            for step in [CheckoutStep::Payment, CheckoutStep::Contacts] {
                if !inner.is_valid(step) {
                    return Err(CoreError::StepIncomplete(step));
                }
            }

            let items = inner.cart.iter().map(|entry| entry.id.clone()).collect();
            (inner.draft.clone(), items)
        };

        let payment = draft
            .payment
            .ok_or(CoreError::StepIncomplete(CheckoutStep::Payment))?;

        Ok(Order {
            payment,
            address: draft.address,
            email: draft.email,
            phone: draft.phone,
            total: self.cart_total()?,
            items,
        })
    }

    // =========================================================================
    // Checkout Phase
    // =========================================================================

    /// Moves the checkout to `next`.
    ///
    /// Same-phase transitions are no-ops and publish nothing.
    ///
    /// ## Guards
    /// - `CartOpen → PaymentStep`: cart not empty
    /// - `PaymentStep → ContactsStep`: payment step valid
    /// - `ContactsStep → Submitting`: contacts step valid
    pub fn transition(&self, next: CheckoutPhase) -> CoreResult<()> {
        let from = {
            let mut inner = self.inner.write();
            let from = inner.phase;

            if from == next {
                return Ok(());
            }
            if !from.can_transition_to(next) {
                return Err(CoreError::InvalidTransition { from, to: next });
            }

            match (from, next) {
                (CheckoutPhase::CartOpen, CheckoutPhase::PaymentStep) if inner.cart.is_empty() => {
                    return Err(CoreError::EmptyCart);
                }
                (CheckoutPhase::PaymentStep, CheckoutPhase::ContactsStep)
                    if !inner.is_valid(CheckoutStep::Payment) =>
                {
                    return Err(CoreError::StepIncomplete(CheckoutStep::Payment));
                }
                (CheckoutPhase::ContactsStep, CheckoutPhase::Submitting)
                    if !inner.is_valid(CheckoutStep::Contacts) =>
                {
                    return Err(CoreError::StepIncomplete(CheckoutStep::Contacts));
                }
                _ => {}
            }

            inner.phase = next;
            from
        };

        debug!(%from, to = %next, "Checkout phase changed");
        self.bus.publish(AppEvent::PhaseChanged { from, to: next })
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn catalog(&self) -> Vec<CatalogItem> {
        self.inner.read().catalog.clone()
    }

    pub fn cart(&self) -> Vec<CatalogItem> {
        self.inner.read().cart.clone()
    }

    pub fn cart_len(&self) -> usize {
        self.inner.read().cart.len()
    }

    pub fn order_draft(&self) -> OrderDraft {
        self.inner.read().draft.clone()
    }

    /// Errors last computed for `step`. Empty until the step's first edit.
    pub fn form_errors(&self, step: CheckoutStep) -> FormErrors {
        self.inner.read().errors.get(&step).cloned().unwrap_or_default()
    }

    pub fn is_step_valid(&self, step: CheckoutStep) -> bool {
        self.inner.read().is_valid(step)
    }

    /// The item shown in the detail view, if any.
    pub fn preview(&self) -> Option<CatalogItem> {
        let inner = self.inner.read();
        inner.preview.as_deref().and_then(|id| inner.find(id)).cloned()
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.inner.read().phase
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
