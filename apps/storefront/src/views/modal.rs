//! Modal window. Holds which view is on top of the page.

use std::fmt;
use std::sync::Arc;

use larek_core::{AppEvent, CoreResult, EventBus};
use parking_lot::Mutex;

/// View shown inside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalContent {
    Preview,
    Basket,
    Payment,
    Contacts,
    Success,
}

impl fmt::Display for ModalContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModalContent::Preview => "item",
            ModalContent::Basket => "basket",
            ModalContent::Payment => "payment",
            ModalContent::Contacts => "contacts",
            ModalContent::Success => "order placed",
        };
        f.write_str(name)
    }
}

pub struct Modal {
    bus: Arc<EventBus>,
    content: Mutex<Option<ModalContent>>,
}

impl Modal {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            content: Mutex::new(None),
        }
    }

    /// Shows `content` and publishes `ModalOpened`.
    pub fn open(&self, content: ModalContent) -> CoreResult<()> {
        *self.content.lock() = Some(content);
        self.bus.publish(AppEvent::ModalOpened)
    }

    /// Hides the modal and publishes `ModalClosed`.
    pub fn close(&self) -> CoreResult<()> {
        self.content.lock().take();
        self.bus.publish(AppEvent::ModalClosed)
    }

    pub fn content(&self) -> Option<ModalContent> {
        *self.content.lock()
    }

    pub fn is_open(&self) -> bool {
        self.content.lock().is_some()
    }
}
