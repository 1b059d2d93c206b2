//! Order confirmation.

use larek_core::Money;
use parking_lot::Mutex;

#[derive(Default)]
pub struct SuccessView {
    total: Mutex<Money>,
}

impl SuccessView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the amount the backend charged.
    pub fn show(&self, total: Money) {
        *self.total.lock() = total;
    }

    pub fn total(&self) -> Money {
        *self.total.lock()
    }

    pub fn render(&self, currency: &str) -> String {
        format!(
            "Order placed\nCharged {} {}\n< Back to shopping >  (close)",
            self.total().synapses(),
            currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_charged_total() {
        let view = SuccessView::new();
        view.show(Money::from_synapses(2500));
        assert!(view.render("synapses").contains("Charged 2500 synapses"));
    }
}
