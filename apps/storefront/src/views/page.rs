//! Page view: basket counter, catalog list, scroll lock and load banner.

use std::sync::Arc;

use larek_core::{AppEvent, CatalogItem, EventBus};
use parking_lot::Mutex;

use super::card::catalog_line;
use crate::error::{AppResult, InputError};
use crate::input::ItemRef;

#[derive(Debug, Default)]
struct PageState {
    counter: usize,
    catalog: Vec<CatalogItem>,
    locked: bool,
    banner: Option<String>,
}

pub struct Page {
    bus: Arc<EventBus>,
    state: Mutex<PageState>,
}

impl Page {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn set_counter(&self, counter: usize) {
        self.state.lock().counter = counter;
    }

    pub fn set_catalog(&self, catalog: Vec<CatalogItem>) {
        self.state.lock().catalog = catalog;
    }

    /// Scroll lock, on while the modal is open.
    pub fn set_locked(&self, locked: bool) {
        self.state.lock().locked = locked;
    }

    /// Shows a failure banner above the catalog; `None` hides it.
    pub fn set_banner(&self, banner: Option<String>) {
        self.state.lock().banner = banner;
    }

    pub fn counter(&self) -> usize {
        self.state.lock().counter
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    pub fn banner(&self) -> Option<String> {
        self.state.lock().banner.clone()
    }

    /// Catalog card click: publishes `CardSelected`.
    pub fn select(&self, which: &ItemRef) -> AppResult<()> {
        let item = {
            let state = self.state.lock();
            match which {
                ItemRef::Position(n) => n
                    .checked_sub(1)
                    .and_then(|i| state.catalog.get(i))
                    .cloned()
                    .ok_or(InputError::OutOfRange {
                        index: *n,
                        len: state.catalog.len(),
                    })?,
                ItemRef::Id(id) => state
                    .catalog
                    .iter()
                    .find(|item| &item.id == id)
                    .cloned()
                    .ok_or_else(|| InputError::UnknownItem(id.clone()))?,
            }
        };

        self.bus.publish(AppEvent::CardSelected(item))?;
        Ok(())
    }

    /// Basket icon click: publishes `BasketOpened`.
    pub fn open_basket(&self) -> AppResult<()> {
        self.bus.publish(AppEvent::BasketOpened)?;
        Ok(())
    }

    /// Header line with the basket counter.
    pub fn render_header(&self) -> String {
        let state = self.state.lock();
        let mut out = format!("WEB-LAREK                                basket: {}", state.counter);
        if let Some(banner) = &state.banner {
            out.push_str(&format!("\n!! {banner}"));
        }
        out
    }

    pub fn render_catalog(&self, currency: &str) -> String {
        let state = self.state.lock();
        if state.catalog.is_empty() {
            return "(catalog is empty)".to_string();
        }
        state
            .catalog
            .iter()
            .enumerate()
            .map(|(i, item)| catalog_line(i + 1, item, currency))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::{Category, EventKind, Money};

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            category: Category::Button,
            price: Some(Money::from_synapses(10)),
            description: None,
            image: String::new(),
        }
    }

    #[test]
    fn test_select_publishes_card() {
        let bus = Arc::new(EventBus::new());
        let selected = Arc::new(Mutex::new(Vec::new()));
        let tap = selected.clone();
        bus.subscribe(EventKind::CardSelected, move |event| {
            if let AppEvent::CardSelected(item) = event {
                tap.lock().push(item.id.clone());
            }
            Ok(())
        });

        let page = Page::new(bus);
        page.set_catalog(vec![item("a"), item("b")]);

        page.select(&ItemRef::Position(2)).unwrap();
        page.select(&ItemRef::Id("a".to_string())).unwrap();
        assert_eq!(*selected.lock(), vec!["b", "a"]);

        assert!(matches!(
            page.select(&ItemRef::Position(3)),
            Err(crate::error::AppError::Input(InputError::OutOfRange { index: 3, len: 2 }))
        ));
    }

    #[test]
    fn test_render() {
        let page = Page::new(Arc::new(EventBus::new()));
        assert_eq!(page.render_catalog("synapses"), "(catalog is empty)");

        page.set_catalog(vec![item("a")]);
        page.set_counter(3);
        page.set_banner(Some("Could not reach the store".to_string()));

        assert_eq!(page.render_catalog("syn"), "[1] Item a — button — 10 syn");
        let header = page.render_header();
        assert!(header.ends_with("basket: 3\n!! Could not reach the store"));
    }
}
