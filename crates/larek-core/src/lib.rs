//! # larek-core: State and Event Logic for Web Larek
//!
//! This crate is the **heart** of the storefront. It owns the application
//! state and the event bus, and has zero network or terminal dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Web Larek Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront (terminal app)                      │   │
//! │  │   Page ──► Card ──► Basket ──► Payment ──► Contacts ──► Success │   │
//! │  └──────────────┬──────────────────────────────────────▲──────────┘   │
//! │                 │ intents (card:select, order:submit)   │ state events │
//! │  ┌──────────────▼──────────────────────────────────────┴──────────┐   │
//! │  │               ★ larek-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    bus    │  │   store   │  │ checkout  │  │ validation│  │   │
//! │  │   │ EventBus  │  │ AppState  │  │  phases   │  │   forms   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO NETWORK • NO TERMINAL • NO FILES                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 larek-api (HTTP client)                         │   │
//! │  │              GET /product, POST /order                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, OrderDraft, Order, etc.)
//! - [`money`] - Integer synapse amounts
//! - [`error`] - Domain error types
//! - [`validation`] - Checkout form and catalog validation
//! - [`events`] - Everything that travels over the bus
//! - [`bus`] - Synchronous publish/subscribe
//! - [`checkout`] - Checkout phase state machine
//! - [`store`] - The application state store
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use larek_core::{AppState, EventBus, EventKind, Money};
//! use larek_core::types::{CatalogItem, Category};
//!
//! let bus = Arc::new(EventBus::new());
//! bus.subscribe(EventKind::CartChanged, |event| {
//!     println!("{}", event.name());
//!     Ok(())
//! });
//!
//! let store = AppState::new(bus);
//! store.set_catalog(vec![CatalogItem {
//!     id: "a".to_string(),
//!     title: "+1 hour in a day".to_string(),
//!     category: Category::SoftSkill,
//!     price: Some(Money::from_synapses(750)),
//!     description: None,
//!     image: String::new(),
//! }])?;
//!
//! store.add_to_cart("a")?;
//! assert_eq!(store.cart_total()?, Money::from_synapses(750));
//! # Ok::<(), larek_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bus;
pub mod checkout;
pub mod error;
pub mod events;
pub mod money;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bus::{EventBus, EventFilter, SubscriptionId};
pub use checkout::CheckoutPhase;
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{AppEvent, EventCategory, EventKind};
pub use money::Money;
pub use store::AppState;
pub use types::*;
pub use validation::FormErrors;
