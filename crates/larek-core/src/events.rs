//! # Application Events
//!
//! Every message that travels over the [`crate::bus::EventBus`].
//!
//! ## Event Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Event Flow                                     │
//! │                                                                         │
//! │   Views ──── Intent ────► Orchestration ────► AppState mutator          │
//! │   (card:select,                                    │                    │
//! │    order.address:change)                           │                    │
//! │                                                    ▼                    │
//! │   Views ◄─── State ───────────────────────── publish after mutation     │
//! │   (items:changed, basket:changed, formErrors:change)                   │
//! │                                                                         │
//! │   Backend worker ──── Backend ────► Orchestration                       │
//! │   (catalog:loaded, order:placed, order:failed)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Subscriptions match on [`EventKind`] (exact) or [`EventCategory`]
//! (family), so adding a variant is a compile error until `kind()` and
//! `category()` handle it.

use std::fmt;

use crate::checkout::CheckoutPhase;
use crate::types::{CatalogItem, CheckoutStep, OrderDraft, OrderField, OrderResult};
use crate::validation::FormErrors;

/// Broad family of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Published by the store after a mutation.
    State,
    /// Published by views on user action.
    Intent,
    /// Published by the backend worker when a network call finishes.
    Backend,
}

/// Fieldless discriminant of [`AppEvent`], used for exact-match subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CatalogChanged,
    PreviewChanged,
    CartChanged,
    CounterChanged,
    OrderChanged,
    StepReady,
    FormErrorsChanged,
    PhaseChanged,
    CardSelected,
    CardToggled,
    CardRemoved,
    BasketOpened,
    OrderOpened,
    FieldChanged,
    PaymentSubmitted,
    ContactsSubmitted,
    ModalOpened,
    ModalClosed,
    CatalogLoaded,
    CatalogLoadFailed,
    OrderPlaced,
    OrderFailed,
}

/// An event published on the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // -------------------------------------------------------------------------
    // State changes
    // -------------------------------------------------------------------------
    /// The catalog was replaced.
    CatalogChanged { catalog: Vec<CatalogItem> },
    /// A different item is shown in the detail view.
    PreviewChanged(CatalogItem),
    /// Cart contents changed (or a removal was requested, see `remove_from_cart`).
    CartChanged(Vec<CatalogItem>),
    /// Cart size, published when the cart is cleared.
    CounterChanged(usize),
    /// The order draft was reset.
    OrderChanged(OrderDraft),
    /// A checkout step just became valid.
    StepReady(CheckoutStep),
    /// Fresh error mapping for one step.
    FormErrorsChanged {
        step: CheckoutStep,
        errors: FormErrors,
    },
    /// The checkout phase moved.
    PhaseChanged {
        from: CheckoutPhase,
        to: CheckoutPhase,
    },

    // -------------------------------------------------------------------------
    // User intents
    // -------------------------------------------------------------------------
    /// A catalog card was clicked.
    CardSelected(CatalogItem),
    /// The detail view's buy/remove button was clicked.
    CardToggled(CatalogItem),
    /// A basket line's delete button was clicked.
    CardRemoved(CatalogItem),
    /// The basket icon was clicked.
    BasketOpened,
    /// The basket's checkout button was clicked.
    OrderOpened,
    /// A checkout form input changed.
    FieldChanged {
        step: CheckoutStep,
        field: OrderField,
        value: String,
    },
    /// The payment form was submitted.
    PaymentSubmitted,
    /// The contacts form was submitted.
    ContactsSubmitted,
    /// The modal became visible.
    ModalOpened,
    /// The modal was dismissed.
    ModalClosed,

    // -------------------------------------------------------------------------
    // Backend results
    // -------------------------------------------------------------------------
    /// `GET /product` succeeded.
    CatalogLoaded(Vec<CatalogItem>),
    /// `GET /product` failed.
    CatalogLoadFailed(String),
    /// `POST /order` succeeded.
    OrderPlaced(OrderResult),
    /// `POST /order` failed.
    OrderFailed(String),
}

impl AppEvent {
    /// Returns the fieldless kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::CatalogChanged { .. } => EventKind::CatalogChanged,
            AppEvent::PreviewChanged(_) => EventKind::PreviewChanged,
            AppEvent::CartChanged(_) => EventKind::CartChanged,
            AppEvent::CounterChanged(_) => EventKind::CounterChanged,
            AppEvent::OrderChanged(_) => EventKind::OrderChanged,
            AppEvent::StepReady(_) => EventKind::StepReady,
            AppEvent::FormErrorsChanged { .. } => EventKind::FormErrorsChanged,
            AppEvent::PhaseChanged { .. } => EventKind::PhaseChanged,
            AppEvent::CardSelected(_) => EventKind::CardSelected,
            AppEvent::CardToggled(_) => EventKind::CardToggled,
            AppEvent::CardRemoved(_) => EventKind::CardRemoved,
            AppEvent::BasketOpened => EventKind::BasketOpened,
            AppEvent::OrderOpened => EventKind::OrderOpened,
            AppEvent::FieldChanged { .. } => EventKind::FieldChanged,
            AppEvent::PaymentSubmitted => EventKind::PaymentSubmitted,
            AppEvent::ContactsSubmitted => EventKind::ContactsSubmitted,
            AppEvent::ModalOpened => EventKind::ModalOpened,
            AppEvent::ModalClosed => EventKind::ModalClosed,
            AppEvent::CatalogLoaded(_) => EventKind::CatalogLoaded,
            AppEvent::CatalogLoadFailed(_) => EventKind::CatalogLoadFailed,
            AppEvent::OrderPlaced(_) => EventKind::OrderPlaced,
            AppEvent::OrderFailed(_) => EventKind::OrderFailed,
        }
    }

    /// Returns the family of this event.
    pub fn category(&self) -> EventCategory {
        self.kind().category()
    }

    /// Diagnostic name, as printed by the wiretap.
    pub fn name(&self) -> String {
        match self {
            AppEvent::StepReady(step) => format!("{}:ready", step.event_prefix()),
            AppEvent::FieldChanged { step, field, .. } => {
                format!("{}.{}:change", step.event_prefix(), field)
            }
            other => other.kind().name().to_string(),
        }
    }
}

impl EventKind {
    /// Family of events of this kind.
    pub fn category(&self) -> EventCategory {
        use EventKind::*;

        match self {
            CatalogChanged | PreviewChanged | CartChanged | CounterChanged | OrderChanged
            | StepReady | FormErrorsChanged | PhaseChanged => EventCategory::State,
            CardSelected | CardToggled | CardRemoved | BasketOpened | OrderOpened
            | FieldChanged | PaymentSubmitted | ContactsSubmitted | ModalOpened
            | ModalClosed => EventCategory::Intent,
            CatalogLoaded | CatalogLoadFailed | OrderPlaced | OrderFailed => {
                EventCategory::Backend
            }
        }
    }

    /// Static diagnostic name for the kind.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::CatalogChanged => "items:changed",
            EventKind::PreviewChanged => "preview:changed",
            EventKind::CartChanged => "basket:changed",
            EventKind::CounterChanged => "counter:changed",
            EventKind::OrderChanged => "order:changed",
            EventKind::StepReady => "step:ready",
            EventKind::FormErrorsChanged => "formErrors:change",
            EventKind::PhaseChanged => "checkout:phase",
            EventKind::CardSelected => "card:select",
            EventKind::CardToggled => "card:toggle",
            EventKind::CardRemoved => "card:remove",
            EventKind::BasketOpened => "basket:open",
            EventKind::OrderOpened => "order:open",
            EventKind::FieldChanged => "field:change",
            EventKind::PaymentSubmitted => "order:submit",
            EventKind::ContactsSubmitted => "contacts:submit",
            EventKind::ModalOpened => "modal:open",
            EventKind::ModalClosed => "modal:close",
            EventKind::CatalogLoaded => "catalog:loaded",
            EventKind::CatalogLoadFailed => "catalog:failed",
            EventKind::OrderPlaced => "order:placed",
            EventKind::OrderFailed => "order:failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
