//! # Event Bus
//!
//! Synchronous publish/subscribe dispatcher connecting the store, the views
//! and the orchestration rules.
//!
//! ## Dispatch Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          publish(event)                                 │
//! │                                                                         │
//! │  1. snapshot = subscriptions.read().clone()   (lock released here)     │
//! │  2. for sub in snapshot (subscription order):                          │
//! │        if sub.filter.matches(event) → (sub.handler)(&event)?           │
//! │  3. first Err aborts the loop and is returned to the publisher         │
//! │                                                                         │
//! │  Handlers may publish, subscribe or unsubscribe re-entrantly.          │
//! │  Subscriptions added during dispatch see the NEXT event, not this one. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::events::{AppEvent, EventCategory, EventKind};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Selects which events a subscription receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Every event (wiretap).
    All,
    /// Events of exactly this kind.
    Kind(EventKind),
    /// Every event in this family.
    Category(EventCategory),
}

impl EventFilter {
    /// Check if an event matches this filter.
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kind(kind) => event.kind() == *kind,
            EventFilter::Category(category) => event.category() == *category,
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kind(kind)
    }
}

impl From<EventCategory> for EventFilter {
    fn from(category: EventCategory) -> Self {
        EventFilter::Category(category)
    }
}

/// Shared handler closure.
pub type EventHandler = Arc<dyn Fn(&AppEvent) -> CoreResult<()> + Send + Sync>;

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Central event bus.
///
/// Shared as `Arc<EventBus>`; there is no global instance.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events matching `filter`.
    ///
    /// Handlers run on the publishing thread, in subscription order.
    pub fn subscribe<F>(&self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) -> CoreResult<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let filter = filter.into();
        tracing::debug!("Subscription {} added for {:?}", id, filter);
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        id
    }

    /// Registers a handler that sees every event.
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) -> CoreResult<()> + Send + Sync + 'static,
    {
        self.subscribe(EventFilter::All, handler)
    }

    /// Removes a subscription.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Delivers `event` to every matching handler.
    ///
    /// ## Errors
    /// The first handler error stops dispatch; later handlers do not run.
    pub fn publish(&self, event: AppEvent) -> CoreResult<()> {
        let snapshot: Vec<Subscription> = self.subscriptions.read().clone();

        for sub in snapshot.iter().filter(|sub| sub.filter.matches(&event)) {
            if let Err(err) = (sub.handler)(&event) {
                tracing::warn!(event = %event.name(), subscription = %sub.id, "Handler failed: {}", err);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
