//! # Orchestration
//!
//! Every subscription that connects user intent, store mutation and
//! re-rendering is registered here, in one place.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Event Flow                                       │
//! │                                                                         │
//! │  view ──Intent──► Orchestrator ──► AppState mutator                     │
//! │                        │                  │                             │
//! │                        │                  └──State──► Orchestrator      │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                 BackendHandle.send()               view setters         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  Storefront::deliver ──Backend──► Orchestrator ──► AppState / views     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Registration order
//! 1. Wiretap (sees every event before any reaction)
//! 2. Reaction per event kind

use std::sync::Arc;

use larek_core::validation::combined_message;
use larek_core::{
    AppEvent, AppState, CheckoutPhase, CheckoutStep, CoreResult, EventBus, EventKind,
    SubscriptionId,
};
use tracing::{debug, error, info, warn};

use crate::backend::{BackendCommand, BackendHandle};
use crate::views::{ModalContent, Views};

type Reaction = fn(&Orchestrator, &AppEvent) -> CoreResult<()>;

/// Reactions to every event kind, sharing the session's store and views.
pub struct Orchestrator {
    store: Arc<AppState>,
    views: Views,
    backend: BackendHandle,
}

/// Registers all subscriptions and returns their ids.
pub fn wire(
    bus: &Arc<EventBus>,
    store: Arc<AppState>,
    views: Views,
    backend: BackendHandle,
) -> Vec<SubscriptionId> {
    let orchestrator = Arc::new(Orchestrator {
        store,
        views,
        backend,
    });

    let mut ids = vec![bus.subscribe_all(|event| {
        debug!(event = %event.name(), payload = ?event, "Event");
        Ok(())
    })];

    let routes: [(EventKind, Reaction); 20] = [
        (EventKind::CatalogLoaded, Orchestrator::on_catalog_loaded),
        (EventKind::CatalogLoadFailed, Orchestrator::on_catalog_load_failed),
        (EventKind::CatalogChanged, Orchestrator::on_catalog_changed),
        (EventKind::CardSelected, Orchestrator::on_card_selected),
        (EventKind::PreviewChanged, Orchestrator::on_preview_changed),
        (EventKind::CardToggled, Orchestrator::on_card_toggled),
        (EventKind::BasketOpened, Orchestrator::on_basket_opened),
        (EventKind::CardRemoved, Orchestrator::on_card_removed),
        (EventKind::OrderOpened, Orchestrator::on_order_opened),
        (EventKind::FieldChanged, Orchestrator::on_field_changed),
        (EventKind::StepReady, Orchestrator::on_step_ready),
        (EventKind::FormErrorsChanged, Orchestrator::on_form_errors_changed),
        (EventKind::PaymentSubmitted, Orchestrator::on_payment_submitted),
        (EventKind::ContactsSubmitted, Orchestrator::on_contacts_submitted),
        (EventKind::OrderPlaced, Orchestrator::on_order_placed),
        (EventKind::OrderFailed, Orchestrator::on_order_failed),
        (EventKind::CartChanged, Orchestrator::on_cart_changed),
        (EventKind::CounterChanged, Orchestrator::on_counter_changed),
        (EventKind::ModalOpened, Orchestrator::on_modal_opened),
        (EventKind::ModalClosed, Orchestrator::on_modal_closed),
    ];

    for (kind, reaction) in routes {
        let orchestrator = orchestrator.clone();
        ids.push(bus.subscribe(kind, move |event| reaction(&orchestrator, event)));
    }

    info!(subscriptions = ids.len(), "Orchestration wired");
    ids
}

impl Orchestrator {
    // =========================================================================
    // Catalog
    // =========================================================================

    fn on_catalog_loaded(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::CatalogLoaded(items) = event else {
            return Ok(());
        };
        info!(items = items.len(), "Catalog loaded");

        if let Err(e) = self.store.set_catalog(items.clone()) {
            self.views
                .page
                .set_banner(Some(format!("The catalog could not be shown: {e}")));
            return Err(e);
        }
        self.views.page.set_banner(None);
        Ok(())
    }

    fn on_catalog_load_failed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::CatalogLoadFailed(message) = event else {
            return Ok(());
        };
        error!("Catalog unavailable: {}", message);
        self.views
            .page
            .set_banner(Some(format!("Could not load the catalog: {message}")));
        Ok(())
    }

    fn on_catalog_changed(&self, event: &AppEvent) -> CoreResult<()> {
        if let AppEvent::CatalogChanged { catalog } = event {
            self.views.page.set_catalog(catalog.clone());
        }
        Ok(())
    }

    // =========================================================================
    // Preview
    // =========================================================================

    fn on_card_selected(&self, event: &AppEvent) -> CoreResult<()> {
        match event {
            AppEvent::CardSelected(item) => self.store.set_preview(&item.id),
            _ => Ok(()),
        }
    }

    fn on_preview_changed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::PreviewChanged(item) = event else {
            return Ok(());
        };
        let in_cart = self.store.is_in_cart(&item.id);
        self.views.preview.show(item.clone(), in_cart);
        self.views.modal.open(ModalContent::Preview)
    }

    fn on_card_toggled(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::CardToggled(item) = event else {
            return Ok(());
        };
        if self.store.is_in_cart(&item.id) {
            self.store.remove_from_cart(&item.id)?;
        } else {
            self.store.add_to_cart(&item.id)?;
        }
        self.views
            .preview
            .set_in_cart(&item.id, self.store.is_in_cart(&item.id));
        Ok(())
    }

    // =========================================================================
    // Basket
    // =========================================================================

    fn on_basket_opened(&self, _event: &AppEvent) -> CoreResult<()> {
        self.store.transition(CheckoutPhase::CartOpen)?;
        self.views.modal.open(ModalContent::Basket)
    }

    fn on_card_removed(&self, event: &AppEvent) -> CoreResult<()> {
        match event {
            AppEvent::CardRemoved(item) => self.store.remove_from_cart(&item.id),
            _ => Ok(()),
        }
    }

    fn on_cart_changed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::CartChanged(cart) = event else {
            return Ok(());
        };
        let total = self.store.cart_total()?;
        self.views.page.set_counter(cart.len());
        self.views.basket.set_contents(cart.clone(), total);
        Ok(())
    }

    fn on_counter_changed(&self, event: &AppEvent) -> CoreResult<()> {
        if let AppEvent::CounterChanged(count) = event {
            self.views.page.set_counter(*count);
        }
        Ok(())
    }

    // =========================================================================
    // Checkout Forms
    // =========================================================================

    /// Every checkout starts from an empty draft, matching the blank forms.
    fn on_order_opened(&self, _event: &AppEvent) -> CoreResult<()> {
        self.store.transition(CheckoutPhase::PaymentStep)?;
        self.store.reset_order_draft()?;
        self.views.payment.reset();
        self.views.modal.open(ModalContent::Payment)
    }

    fn on_field_changed(&self, event: &AppEvent) -> CoreResult<()> {
        match event {
            AppEvent::FieldChanged { step, field, value } => {
                self.store.set_field(*step, *field, value)
            }
            _ => Ok(()),
        }
    }

    fn on_step_ready(&self, event: &AppEvent) -> CoreResult<()> {
        if let AppEvent::StepReady(CheckoutStep::Payment) = event {
            self.views
                .payment
                .reflect_payment(self.store.order_draft().payment);
        }
        Ok(())
    }

    fn on_form_errors_changed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::FormErrorsChanged { step, errors } = event else {
            return Ok(());
        };
        let valid = errors.is_empty();
        let message = combined_message(errors);
        match step {
            CheckoutStep::Payment => self.views.payment.set_validation(valid, message),
            CheckoutStep::Contacts => self.views.contacts.set_validation(valid, message),
        }
        Ok(())
    }

    fn on_payment_submitted(&self, _event: &AppEvent) -> CoreResult<()> {
        self.store.transition(CheckoutPhase::ContactsStep)?;
        self.views.contacts.reset();
        self.views.modal.open(ModalContent::Contacts)
    }

    fn on_contacts_submitted(&self, _event: &AppEvent) -> CoreResult<()> {
        let order = match self.store.build_order() {
            Ok(order) => order,
            Err(e) => {
                warn!("Order not sent: {}", e);
                self.views.contacts.show_failure(e.to_string());
                return Ok(());
            }
        };

        self.store.transition(CheckoutPhase::Submitting)?;
        self.views.contacts.set_submitting();
        info!(items = order.items.len(), total = %order.total, "Submitting order");

        if let Err(e) = self.backend.send(BackendCommand::SubmitOrder(order)) {
            self.store.transition(CheckoutPhase::ContactsStep)?;
            self.views.contacts.show_failure(e.to_string());
            return Err(e);
        }
        Ok(())
    }

    // =========================================================================
    // Order Result
    // =========================================================================

    fn on_order_placed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::OrderPlaced(result) = event else {
            return Ok(());
        };
        info!(order_id = %result.id, total = %result.total, "Order placed");

        self.store.transition(CheckoutPhase::Confirmed)?;
        self.views.success.show(result.total);
        self.views.modal.open(ModalContent::Success)?;
        self.store.clear_cart()?;
        self.store.reset_order_draft()
    }

    fn on_order_failed(&self, event: &AppEvent) -> CoreResult<()> {
        let AppEvent::OrderFailed(message) = event else {
            return Ok(());
        };
        error!("Order failed: {}", message);

        self.store.transition(CheckoutPhase::ContactsStep)?;
        self.views.contacts.show_failure(message.clone());
        if self.views.modal.content() != Some(ModalContent::Contacts) {
            self.views.modal.open(ModalContent::Contacts)?;
        }
        Ok(())
    }

    // =========================================================================
    // Modal
    // =========================================================================

    fn on_modal_opened(&self, _event: &AppEvent) -> CoreResult<()> {
        self.views.page.set_locked(true);
        Ok(())
    }

    fn on_modal_closed(&self, _event: &AppEvent) -> CoreResult<()> {
        self.views.page.set_locked(false);
        if self.store.phase() != CheckoutPhase::Submitting {
            self.store.transition(CheckoutPhase::Catalog)?;
        }
        Ok(())
    }
}
