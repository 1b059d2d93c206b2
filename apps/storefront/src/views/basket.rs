//! Basket view: line items, total and the checkout button.

use std::sync::Arc;

use larek_core::{AppEvent, CatalogItem, EventBus, Money};
use parking_lot::Mutex;

use super::card::basket_line;
use crate::error::{AppResult, InputError};

#[derive(Debug, Default)]
struct BasketState {
    items: Vec<CatalogItem>,
    total: Money,
}

pub struct BasketView {
    bus: Arc<EventBus>,
    state: Mutex<BasketState>,
}

impl BasketView {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(BasketState::default()),
        }
    }

    pub fn set_contents(&self, items: Vec<CatalogItem>, total: Money) {
        let mut state = self.state.lock();
        state.items = items;
        state.total = total;
    }

    pub fn total(&self) -> Money {
        self.state.lock().total
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete button of line `position`: publishes `CardRemoved`.
    pub fn remove(&self, position: usize) -> AppResult<()> {
        let item = {
            let state = self.state.lock();
            position
                .checked_sub(1)
                .and_then(|i| state.items.get(i))
                .cloned()
                .ok_or(InputError::OutOfRange {
                    index: position,
                    len: state.items.len(),
                })?
        };

        self.bus.publish(AppEvent::CardRemoved(item))?;
        Ok(())
    }

    /// Checkout button: publishes `OrderOpened`. Disabled while empty.
    pub fn checkout(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(InputError::Disabled("Basket is empty".to_string()).into());
        }
        self.bus.publish(AppEvent::OrderOpened)?;
        Ok(())
    }

    pub fn render(&self, currency: &str) -> String {
        let state = self.state.lock();
        let mut out = String::from("Basket\n");

        if state.items.is_empty() {
            out.push_str("(empty)\n");
        }
        for (i, item) in state.items.iter().enumerate() {
            out.push_str(&basket_line(i + 1, item, currency));
            out.push('\n');
        }

        out.push_str(&format!("Total: {} {}\n", state.total.synapses(), currency));
        if state.items.is_empty() {
            out.push_str("< Checkout >  (disabled)");
        } else {
            out.push_str("< Checkout >  (order)");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::{Category, EventKind};

    fn item(id: &str, price: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            category: Category::HardSkill,
            price: Some(Money::from_synapses(price)),
            description: None,
            image: String::new(),
        }
    }

    #[test]
    fn test_render_with_total() {
        let basket = BasketView::new(Arc::new(EventBus::new()));
        basket.set_contents(vec![item("a", 100), item("b", 50)], Money::from_synapses(150));

        let text = basket.render("synapses");
        assert!(text.contains("1. Item a  100 synapses\n2. Item b  50 synapses"));
        assert!(text.contains("Total: 150 synapses"));
        assert!(text.ends_with("(order)"));
    }

    #[test]
    fn test_empty_basket_disables_checkout() {
        let basket = BasketView::new(Arc::new(EventBus::new()));
        assert!(basket.render("synapses").ends_with("(disabled)"));
        assert!(basket.checkout().is_err());
    }

    #[test]
    fn test_remove_publishes_line_item() {
        let bus = Arc::new(EventBus::new());
        let removed = Arc::new(Mutex::new(None));
        let slot = removed.clone();
        bus.subscribe(EventKind::CardRemoved, move |event| {
            if let AppEvent::CardRemoved(item) = event {
                *slot.lock() = Some(item.id.clone());
            }
            Ok(())
        });

        let basket = BasketView::new(bus);
        basket.set_contents(vec![item("a", 1), item("b", 2)], Money::from_synapses(3));
        basket.remove(2).unwrap();

        assert_eq!(removed.lock().as_deref(), Some("b"));
        assert!(basket.remove(0).is_err());
    }
}
