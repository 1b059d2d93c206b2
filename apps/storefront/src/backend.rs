//! # Backend Worker
//!
//! Runs the two network calls off the synchronous publish path. Results come
//! back as events on a second queue; the shell task publishes them, so every
//! dispatch happens on one task.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Backend Command Queue                             │
//! │                                                                         │
//! │  shell task                         BackendWorker (tokio task)          │
//! │  ──────────                         ──────────────────────────          │
//! │  backend.send(SubmitOrder) ──mpsc──► recv()                             │
//! │        returns immediately              │                               │
//! │                                         ▼                               │
//! │                                  api.place_order(&order).await          │
//! │                                         │                               │
//! │  results.recv() ◄──mpsc── OrderPlaced | OrderFailed                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Storefront::deliver(event) ──► bus.publish                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop ends once every [`BackendHandle`] is dropped. A request already
//! in flight runs to completion.

use std::sync::Arc;

use larek_api::StoreApi;
use larek_core::{AppEvent, CoreError, CoreResult, Order};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Work for the backend worker.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// `GET /product`, answered with `CatalogLoaded` or `CatalogLoadFailed`.
    LoadCatalog,
    /// `POST /order`, answered with `OrderPlaced` or `OrderFailed`.
    SubmitOrder(Order),
}

impl BackendCommand {
    fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadCatalog => "LoadCatalog",
            BackendCommand::SubmitOrder(_) => "SubmitOrder",
        }
    }
}

/// Sending half of the command queue, cloned into handlers.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    tx: mpsc::UnboundedSender<BackendCommand>,
}

impl BackendHandle {
    /// Queues a command without waiting for it.
    ///
    /// ## Errors
    /// `CoreError::Handler` if the worker has stopped.
    pub fn send(&self, command: BackendCommand) -> CoreResult<()> {
        let name = command.name();
        debug!(command = name, "Queueing backend command");
        self.tx.send(command).map_err(|_| CoreError::Handler {
            event: name.to_string(),
            message: "backend worker is not running".to_string(),
        })
    }
}

/// Receives [`BackendCommand`]s and queues their results as events.
///
/// The worker never touches the bus.
pub struct BackendWorker {
    api: Arc<dyn StoreApi>,
    rx: mpsc::UnboundedReceiver<BackendCommand>,
    results: mpsc::UnboundedSender<AppEvent>,
}

/// Receiving half of the result queue, owned by the shell task.
#[derive(Debug)]
pub struct BackendResults {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl BackendResults {
    /// Waits for the next result. `None` once the worker is gone and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Next result if one is queued right now.
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        self.rx.try_recv().ok()
    }
}

/// Creates a connected handle, worker and result queue.
pub fn channel(api: Arc<dyn StoreApi>) -> (BackendHandle, BackendWorker, BackendResults) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    (
        BackendHandle { tx },
        BackendWorker {
            api,
            rx,
            results: results_tx,
        },
        BackendResults { rx: results_rx },
    )
}

impl BackendWorker {
    /// Processes commands until every handle is dropped.
    pub async fn run(mut self) {
        info!("Backend worker started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command).await;
        }
        info!("Backend worker stopped");
    }

    /// Processes every command queued right now. Returns how many were
    /// handled.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(command) = self.rx.try_recv() {
            self.handle(command).await;
            handled += 1;
        }
        handled
    }

    async fn handle(&self, command: BackendCommand) {
        debug!(command = command.name(), "Dispatching backend command");

        let event = match command {
            BackendCommand::LoadCatalog => match self.api.fetch_catalog().await {
                Ok(items) => AppEvent::CatalogLoaded(items),
                Err(e) => {
                    error!("Failed to load catalog: {}", e);
                    AppEvent::CatalogLoadFailed(e.user_message())
                }
            },
            BackendCommand::SubmitOrder(order) => match self.api.place_order(&order).await {
                Ok(result) => AppEvent::OrderPlaced(result),
                Err(e) => {
                    error!("Order submission failed: {}", e);
                    AppEvent::OrderFailed(e.user_message())
                }
            },
        };

        if self.results.send(event).is_err() {
            warn!("Backend result dropped: the session is gone");
        }
    }
}
