//! # Storefront Session
//!
//! Owns one running storefront: bus, store, views and the backend handle.
//! Typed commands become view intents here; which commands apply depends on
//! what the modal is showing.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Modal content     Accepted commands                                    │
//! │  ─────────────     ─────────────────                                    │
//! │  (none)            list, show, basket                                   │
//! │  Preview           toggle, close (+ page commands)                      │
//! │  Basket            remove, order, close (+ page commands)               │
//! │  Payment           pay, address, next, close                            │
//! │  Contacts          email, phone, submit, close                          │
//! │  Success           close                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Page commands (`list`, `show`, `basket`) close whatever is open first.

use std::sync::Arc;

use larek_api::StoreApi;
use larek_core::{AppEvent, AppState, CoreResult, EventBus, SubscriptionId};
use tracing::{debug, info};

use crate::backend::{self, BackendCommand, BackendHandle, BackendResults, BackendWorker};
use crate::config::StorefrontConfig;
use crate::error::{AppResult, InputError};
use crate::input::UserCommand;
use crate::orchestration;
use crate::views::{ModalContent, Views};

/// What the shell should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Help,
    Quit,
}

pub struct Storefront {
    bus: Arc<EventBus>,
    store: Arc<AppState>,
    views: Views,
    backend: BackendHandle,
    subscriptions: Vec<SubscriptionId>,
    currency: String,
}

impl Storefront {
    /// Builds a session and wires orchestration.
    ///
    /// The worker must be spawned (or drained) for results to be produced.
    /// Each result only takes effect once passed to [`Storefront::deliver`].
    pub fn new(
        api: Arc<dyn StoreApi>,
        config: &StorefrontConfig,
    ) -> (Self, BackendWorker, BackendResults) {
        let bus = Arc::new(EventBus::new());
        let store = Arc::new(AppState::new(bus.clone()));
        let views = Views::new(&bus);
        let (backend, worker, results) = backend::channel(api);

        let subscriptions =
            orchestration::wire(&bus, store.clone(), views.clone(), backend.clone());

        let storefront = Self {
            bus,
            store,
            views,
            backend,
            subscriptions,
            currency: config.currency_label().to_string(),
        };
        (storefront, worker, results)
    }

    pub fn store(&self) -> &Arc<AppState> {
        &self.store
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Queues the initial catalog fetch.
    pub fn load_catalog(&self) -> CoreResult<()> {
        info!("Loading catalog");
        self.backend.send(BackendCommand::LoadCatalog)
    }

    /// Publishes a backend result on the caller's task.
    pub fn deliver(&self, event: AppEvent) -> CoreResult<()> {
        debug!(event = %event.name(), "Delivering backend result");
        self.bus.publish(event)
    }

    /// Runs one typed command against the current screen.
    pub fn execute(&self, command: UserCommand) -> AppResult<Flow> {
        debug!(%command, "Executing command");
        let views = &self.views;

        match command {
            UserCommand::List => self.close_modal()?,
            UserCommand::Show(which) => {
                self.close_modal()?;
                views.page.select(&which)?;
            }
            UserCommand::Basket => {
                self.close_modal()?;
                views.page.open_basket()?;
            }
            UserCommand::Toggle => {
                self.require(ModalContent::Preview, "toggle", "open an item with `show` first")?;
                views.preview.toggle()?;
            }
            UserCommand::Remove(position) => {
                self.require(ModalContent::Basket, "remove", "open the basket first")?;
                views.basket.remove(position)?;
            }
            UserCommand::Order => {
                self.require(ModalContent::Basket, "order", "open the basket first")?;
                views.basket.checkout()?;
            }
            UserCommand::Pay(method) => {
                self.require(ModalContent::Payment, "pay", "start checkout with `order`")?;
                views.payment.choose(method)?;
            }
            UserCommand::Address(address) => {
                self.require(ModalContent::Payment, "address", "start checkout with `order`")?;
                views.payment.set_address(&address)?;
            }
            UserCommand::Next => {
                self.require(ModalContent::Payment, "next", "start checkout with `order`")?;
                views.payment.submit()?;
            }
            UserCommand::Email(email) => {
                self.require(ModalContent::Contacts, "email", "finish the payment step first")?;
                views.contacts.set_email(&email)?;
            }
            UserCommand::Phone(phone) => {
                self.require(ModalContent::Contacts, "phone", "finish the payment step first")?;
                views.contacts.set_phone(&phone)?;
            }
            UserCommand::Submit => {
                self.require(ModalContent::Contacts, "submit", "finish the payment step first")?;
                views.contacts.submit()?;
            }
            UserCommand::Close => {
                if !views.modal.is_open() {
                    return Err(InputError::NotAvailable {
                        command: "close",
                        hint: "nothing is open",
                    }
                    .into());
                }
                views.modal.close()?;
            }
            UserCommand::Help => return Ok(Flow::Help),
            UserCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// The whole screen: header, then the modal or the catalog.
    pub fn render(&self) -> String {
        let views = &self.views;
        let body = match views.modal.content() {
            None => views.page.render_catalog(&self.currency),
            Some(content) => {
                let inner = match content {
                    ModalContent::Preview => views.preview.render(&self.currency),
                    ModalContent::Basket => views.basket.render(&self.currency),
                    ModalContent::Payment => views.payment.render(),
                    ModalContent::Contacts => views.contacts.render(),
                    ModalContent::Success => views.success.render(&self.currency),
                };
                format!("── {content} ──\n{inner}")
            }
        };
        format!("{}\n\n{}", views.page.render_header(), body)
    }

    /// Removes every orchestration subscription.
    pub fn shutdown(&mut self) {
        let removed = self
            .subscriptions
            .drain(..)
            .filter(|id| self.bus.unsubscribe(*id))
            .count();
        info!(removed, "Storefront session closed");
    }

    fn close_modal(&self) -> CoreResult<()> {
        if self.views.modal.is_open() {
            self.views.modal.close()?;
        }
        Ok(())
    }

    fn require(
        &self,
        content: ModalContent,
        command: &'static str,
        hint: &'static str,
    ) -> Result<(), InputError> {
        if self.views.modal.content() == Some(content) {
            Ok(())
        } else {
            Err(InputError::NotAvailable { command, hint })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::input::ItemRef;
    use async_trait::async_trait;
    use larek_api::ApiResult;
    use larek_core::{CatalogItem, Category, CheckoutPhase, Money, Order, OrderResult, PaymentMethod};

    struct ShopApi;

    #[async_trait]
    impl StoreApi for ShopApi {
        async fn fetch_catalog(&self) -> ApiResult<Vec<CatalogItem>> {
            Ok(vec![CatalogItem {
                id: "a".to_string(),
                title: "Бэкенд-антистресс".to_string(),
                category: Category::Other,
                price: Some(Money::from_synapses(1000)),
                description: None,
                image: String::new(),
            }])
        }

        async fn place_order(&self, order: &Order) -> ApiResult<OrderResult> {
            Ok(OrderResult {
                id: "order-1".to_string(),
                total: order.total,
            })
        }
    }

    struct Backend {
        worker: BackendWorker,
        results: BackendResults,
    }

    impl Backend {
        /// Runs queued commands and delivers every result to `app`.
        async fn settle(&mut self, app: &Storefront) {
            self.worker.drain().await;
            while let Some(event) = self.results.try_recv() {
                app.deliver(event).unwrap();
            }
        }
    }

    async fn started() -> (Storefront, Backend) {
        let (app, worker, results) =
            Storefront::new(Arc::new(ShopApi), &StorefrontConfig::default());
        let mut backend = Backend { worker, results };
        app.load_catalog().unwrap();
        backend.settle(&app).await;
        (app, backend)
    }

    fn run(app: &Storefront, line: &str) -> AppResult<Flow> {
        app.execute(line.parse()?)
    }

    #[tokio::test]
    async fn test_typed_checkout() {
        let (app, mut backend) = started().await;

        for line in [
            "show 1",
            "toggle",
            "basket",
            "order",
            "pay cash",
            "address Main St",
            "next",
            "email a@b.c",
            "phone 123",
            "submit",
        ] {
            assert_eq!(run(&app, line).unwrap(), Flow::Continue, "{line}");
        }
        backend.settle(&app).await;

        assert_eq!(app.store().phase(), CheckoutPhase::Confirmed);
        assert!(app.render().contains("Charged 1000 synapses"));

        run(&app, "close").unwrap();
        assert!(app.render().contains("[1] Бэкенд-антистресс"));
    }

    #[tokio::test]
    async fn test_commands_need_matching_screen() {
        let (app, _backend) = started().await;

        assert!(matches!(
            run(&app, "toggle"),
            Err(AppError::Input(InputError::NotAvailable { command: "toggle", .. }))
        ));
        assert!(matches!(
            run(&app, "close"),
            Err(AppError::Input(InputError::NotAvailable { command: "close", .. }))
        ));
        assert_eq!(run(&app, "help").unwrap(), Flow::Help);
        assert_eq!(run(&app, "quit").unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn test_page_commands_close_modal() {
        let (app, _backend) = started().await;

        app.execute(UserCommand::Show(ItemRef::Id("a".to_string()))).unwrap();
        assert!(app.render().contains("── item ──"));

        run(&app, "basket").unwrap();
        assert_eq!(app.views().modal.content(), Some(ModalContent::Basket));
        assert_eq!(app.store().phase(), CheckoutPhase::CartOpen);

        run(&app, "list").unwrap();
        assert!(!app.views().modal.is_open());
        assert_eq!(app.store().phase(), CheckoutPhase::Catalog);
    }

    #[tokio::test]
    async fn test_payment_choice_shown_on_form() {
        let (app, _backend) = started().await;
        app.store().add_to_cart("a").unwrap();

        run(&app, "basket").unwrap();
        run(&app, "order").unwrap();
        run(&app, "pay card").unwrap();

        let screen = app.render();
        assert!(screen.contains("[x] card  [ ] cash"));
        assert!(screen.contains("(disabled)"));
        assert_eq!(app.store().order_draft().payment, Some(PaymentMethod::Card));
    }

    #[tokio::test]
    async fn test_shutdown_unsubscribes() {
        let (mut app, _backend) = started().await;
        app.shutdown();
        assert_eq!(app.bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_close_while_submitting_then_result() {
        let (app, mut backend) = started().await;
        app.store().add_to_cart("a").unwrap();

        for line in [
            "basket",
            "order",
            "pay card",
            "address Main St",
            "next",
            "email a@b.c",
            "phone 123",
            "submit",
        ] {
            run(&app, line).unwrap();
        }
        backend.worker.drain().await;
        assert_eq!(app.store().phase(), CheckoutPhase::Submitting);

        run(&app, "close").unwrap();
        assert_eq!(app.store().phase(), CheckoutPhase::Submitting);
        assert!(!app.views().modal.is_open());

        let result = backend.results.try_recv().unwrap();
        app.deliver(result).unwrap();

        assert_eq!(app.store().phase(), CheckoutPhase::Confirmed);
        assert_eq!(app.views().modal.content(), Some(ModalContent::Success));
        assert!(app.render().contains("Charged 1000 synapses"));

        run(&app, "close").unwrap();
        assert_eq!(app.store().phase(), CheckoutPhase::Catalog);
        assert!(!app.views().modal.is_open());
    }
}
