//! # Views
//!
//! Terminal renditions of the storefront's UI components.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page ─────────── header (counter, banner) + catalog list               │
//! │  Modal ────────── which of the views below is on top                    │
//! │    ├── PreviewCard   item detail + buy/remove button                    │
//! │    ├── BasketView    line items, total, checkout button                 │
//! │    ├── PaymentForm   card/cash + address                                │
//! │    ├── ContactsForm  email + phone                                      │
//! │    └── SuccessView   charged total                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Views never touch [`larek_core::AppState`]. They render what they were
//! last given and turn user actions into intent events on the bus.

pub mod basket;
pub mod card;
pub mod forms;
pub mod modal;
pub mod page;
pub mod success;

use std::sync::Arc;

use larek_core::EventBus;

pub use basket::BasketView;
pub use card::PreviewCard;
pub use forms::{ContactsForm, PaymentForm};
pub use modal::{Modal, ModalContent};
pub use page::Page;
pub use success::SuccessView;

/// Every view of one session, shared with orchestration handlers.
#[derive(Clone)]
pub struct Views {
    pub page: Arc<Page>,
    pub modal: Arc<Modal>,
    pub preview: Arc<PreviewCard>,
    pub basket: Arc<BasketView>,
    pub payment: Arc<PaymentForm>,
    pub contacts: Arc<ContactsForm>,
    pub success: Arc<SuccessView>,
}

impl Views {
    pub fn new(bus: &Arc<EventBus>) -> Self {
        Self {
            page: Arc::new(Page::new(bus.clone())),
            modal: Arc::new(Modal::new(bus.clone())),
            preview: Arc::new(PreviewCard::new(bus.clone())),
            basket: Arc::new(BasketView::new(bus.clone())),
            payment: Arc::new(PaymentForm::new(bus.clone())),
            contacts: Arc::new(ContactsForm::new(bus.clone())),
            success: Arc::new(SuccessView::new()),
        }
    }
}
