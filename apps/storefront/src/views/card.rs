//! Card views: catalog line, detail (preview) block and basket line.

use std::sync::Arc;

use larek_core::{AppEvent, CatalogItem, EventBus, Money};
use parking_lot::Mutex;

use crate::error::{AppResult, InputError};

/// Price as printed on cards. Priceless items read "Priceless".
pub fn price_text(price: Option<Money>, currency: &str) -> String {
    match price {
        Some(price) => format!("{} {}", price.synapses(), currency),
        None => "Priceless".to_string(),
    }
}

/// `[n] title — category — price`
pub fn catalog_line(position: usize, item: &CatalogItem, currency: &str) -> String {
    format!(
        "[{}] {} — {} — {}",
        position,
        item.title,
        item.category,
        price_text(item.price, currency)
    )
}

/// `n. title  price`
pub fn basket_line(position: usize, item: &CatalogItem, currency: &str) -> String {
    format!(
        "{}. {}  {}",
        position,
        item.title,
        price_text(item.price, currency)
    )
}

/// Label of the detail view's action button.
pub fn action_label(item: &CatalogItem, in_cart: bool) -> &'static str {
    if in_cart {
        "Remove from basket"
    } else if item.is_priceless() {
        "Not for sale"
    } else {
        "Buy"
    }
}

#[derive(Debug, Clone)]
struct PreviewState {
    item: CatalogItem,
    in_cart: bool,
}

/// Detail view of the previewed item.
pub struct PreviewCard {
    bus: Arc<EventBus>,
    state: Mutex<Option<PreviewState>>,
}

impl PreviewCard {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(None),
        }
    }

    /// Shows `item` with a button label derived from `in_cart`.
    pub fn show(&self, item: CatalogItem, in_cart: bool) {
        *self.state.lock() = Some(PreviewState { item, in_cart });
    }

    /// Refreshes the button label if `id` is the item on display.
    pub fn set_in_cart(&self, id: &str, in_cart: bool) {
        if let Some(state) = self.state.lock().as_mut().filter(|s| s.item.id == id) {
            state.in_cart = in_cart;
        }
    }

    pub fn item(&self) -> Option<CatalogItem> {
        self.state.lock().as_ref().map(|s| s.item.clone())
    }

    /// The action button: publishes `CardToggled`.
    ///
    /// Disabled for a priceless item that is not already in the basket.
    pub fn toggle(&self) -> AppResult<()> {
        let item = {
            let state = self.state.lock();
            let state = state.as_ref().ok_or(InputError::NotAvailable {
                command: "toggle",
                hint: "open an item with `show` first",
            })?;
            if state.item.is_priceless() && !state.in_cart {
                return Err(InputError::Disabled(format!("{} is not for sale", state.item.title)).into());
            }
            state.item.clone()
        };

        self.bus.publish(AppEvent::CardToggled(item))?;
        Ok(())
    }

    pub fn render(&self, currency: &str) -> String {
        let state = self.state.lock();
        let Some(state) = state.as_ref() else {
            return String::new();
        };
        let item = &state.item;

        let mut out = format!("{}\n[{}]\n", item.title, item.category);
        if let Some(description) = &item.description {
            for paragraph in description.paragraphs() {
                out.push_str(paragraph);
                out.push('\n');
            }
        }
        if !item.image.is_empty() {
            out.push_str(&format!("image: {}\n", item.image));
        }
        out.push_str(&format!(
            "{}\n< {} >  (toggle)",
            price_text(item.price, currency),
            action_label(item, state.in_cart)
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::{Category, Description, EventKind};

    fn item(price: Option<i64>) -> CatalogItem {
        CatalogItem {
            id: "a".to_string(),
            title: "+1 hour".to_string(),
            category: Category::SoftSkill,
            price: price.map(Money::from_synapses),
            description: Some(Description::Paragraphs(vec![
                "one".to_string(),
                "two".to_string(),
            ])),
            image: "https://cdn.test/a.svg".to_string(),
        }
    }

    #[test]
    fn test_lines() {
        assert_eq!(
            catalog_line(1, &item(Some(750)), "synapses"),
            "[1] +1 hour — soft skill — 750 synapses"
        );
        assert_eq!(basket_line(2, &item(None), "synapses"), "2. +1 hour  Priceless");
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label(&item(Some(1)), false), "Buy");
        assert_eq!(action_label(&item(Some(1)), true), "Remove from basket");
        assert_eq!(action_label(&item(None), false), "Not for sale");
    }

    #[test]
    fn test_preview_render_and_toggle() {
        let bus = Arc::new(EventBus::new());
        let toggled = Arc::new(Mutex::new(0));
        let counter = toggled.clone();
        bus.subscribe(EventKind::CardToggled, move |_| {
            *counter.lock() += 1;
            Ok(())
        });

        let preview = PreviewCard::new(bus);
        assert!(preview.toggle().is_err());

        preview.show(item(Some(750)), false);
        let text = preview.render("synapses");
        assert!(text.contains("one\ntwo\n"));
        assert!(text.contains("< Buy >"));

        preview.toggle().unwrap();
        assert_eq!(*toggled.lock(), 1);

        preview.set_in_cart("a", true);
        assert!(preview.render("synapses").contains("< Remove from basket >"));
    }

    #[test]
    fn test_priceless_toggle_disabled() {
        let preview = PreviewCard::new(Arc::new(EventBus::new()));
        preview.show(item(None), false);

        assert!(matches!(
            preview.toggle(),
            Err(crate::error::AppError::Input(InputError::Disabled(_)))
        ));
    }
}
