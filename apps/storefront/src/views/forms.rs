//! Checkout forms: payment/address, then email/phone.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  typed input ──► form.set_*() ──► FieldChanged ──► AppState::set_field  │
//! │                                                          │              │
//! │  form.set_validation(valid, errors) ◄── FormErrorsChanged┘              │
//! │                                                                         │
//! │  form.submit() is refused until the last FormErrorsChanged was empty.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Forms keep their own copy of what was typed, the way an input element
//! does; the store's draft stays the source of truth for the order.

use std::sync::Arc;

use larek_core::{AppEvent, CheckoutStep, EventBus, OrderField, PaymentMethod};
use parking_lot::Mutex;

use crate::error::{AppResult, InputError};

/// Submit-button state shared by both forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub valid: bool,
    pub errors: String,
}

impl FormStatus {
    fn refuse(&self, fallback: &str) -> InputError {
        if self.errors.is_empty() {
            InputError::Disabled(fallback.to_string())
        } else {
            InputError::Disabled(self.errors.clone())
        }
    }

    fn render(&self, button: &str, command: &str) -> String {
        let mut out = String::new();
        if !self.errors.is_empty() {
            out.push_str(&format!("! {}\n", self.errors));
        }
        if self.valid {
            out.push_str(&format!("< {button} >  ({command})"));
        } else {
            out.push_str(&format!("< {button} >  (disabled)"));
        }
        out
    }
}

fn field_changed(step: CheckoutStep, field: OrderField, value: &str) -> AppEvent {
    AppEvent::FieldChanged {
        step,
        field,
        value: value.to_string(),
    }
}

// =============================================================================
// Payment Form
// =============================================================================

#[derive(Debug, Default)]
struct PaymentState {
    payment: Option<PaymentMethod>,
    address: String,
    status: FormStatus,
}

pub struct PaymentForm {
    bus: Arc<EventBus>,
    state: Mutex<PaymentState>,
}

impl PaymentForm {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(PaymentState::default()),
        }
    }

    /// Blank form, submit disabled.
    pub fn reset(&self) {
        *self.state.lock() = PaymentState::default();
    }

    /// Card / cash buttons.
    pub fn choose(&self, method: PaymentMethod) -> AppResult<()> {
        self.bus.publish(field_changed(
            CheckoutStep::Payment,
            OrderField::Payment,
            method.as_str(),
        ))?;
        self.state.lock().payment = Some(method);
        Ok(())
    }

    /// Address input.
    pub fn set_address(&self, address: &str) -> AppResult<()> {
        self.bus.publish(field_changed(
            CheckoutStep::Payment,
            OrderField::Address,
            address,
        ))?;
        self.state.lock().address = address.to_string();
        Ok(())
    }

    /// Highlights the payment method the store accepted.
    pub fn reflect_payment(&self, method: Option<PaymentMethod>) {
        self.state.lock().payment = method;
    }

    pub fn set_validation(&self, valid: bool, errors: String) {
        self.state.lock().status = FormStatus { valid, errors };
    }

    pub fn status(&self) -> FormStatus {
        self.state.lock().status.clone()
    }

    /// "Next" button: publishes `PaymentSubmitted`.
    pub fn submit(&self) -> AppResult<()> {
        {
            let state = self.state.lock();
            if !state.status.valid {
                return Err(state
                    .status
                    .refuse("Choose a payment method and enter an address")
                    .into());
            }
        }
        self.bus.publish(AppEvent::PaymentSubmitted)?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let state = self.state.lock();
        let marks: Vec<String> = PaymentMethod::ALL
            .iter()
            .map(|method| {
                let mark = if state.payment == Some(*method) { "x" } else { " " };
                format!("[{mark}] {method}")
            })
            .collect();

        format!(
            "Payment\n{}\nAddress: {}\n{}",
            marks.join("  "),
            state.address,
            state.status.render("Next", "next")
        )
    }
}

// =============================================================================
// Contacts Form
// =============================================================================

#[derive(Debug, Default)]
struct ContactsState {
    email: String,
    phone: String,
    status: FormStatus,
    submitting: bool,
    failure: Option<String>,
}

pub struct ContactsForm {
    bus: Arc<EventBus>,
    state: Mutex<ContactsState>,
}

impl ContactsForm {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            state: Mutex::new(ContactsState::default()),
        }
    }

    /// Blank form, submit disabled.
    pub fn reset(&self) {
        *self.state.lock() = ContactsState::default();
    }

    pub fn set_email(&self, email: &str) -> AppResult<()> {
        self.bus.publish(field_changed(
            CheckoutStep::Contacts,
            OrderField::Email,
            email,
        ))?;
        self.state.lock().email = email.to_string();
        Ok(())
    }

    pub fn set_phone(&self, phone: &str) -> AppResult<()> {
        self.bus.publish(field_changed(
            CheckoutStep::Contacts,
            OrderField::Phone,
            phone,
        ))?;
        self.state.lock().phone = phone.to_string();
        Ok(())
    }

    pub fn set_validation(&self, valid: bool, errors: String) {
        self.state.lock().status = FormStatus { valid, errors };
    }

    pub fn status(&self) -> FormStatus {
        self.state.lock().status.clone()
    }

    /// Marks the order as sent; the submit button stays disabled meanwhile.
    pub fn set_submitting(&self) {
        let mut state = self.state.lock();
        state.submitting = true;
        state.failure = None;
    }

    /// Shows why the order was not placed and re-enables submit.
    pub fn show_failure(&self, message: String) {
        let mut state = self.state.lock();
        state.submitting = false;
        state.failure = Some(message);
    }

    pub fn failure(&self) -> Option<String> {
        self.state.lock().failure.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// "Pay" button: publishes `ContactsSubmitted`.
    pub fn submit(&self) -> AppResult<()> {
        {
            let state = self.state.lock();
            if state.submitting {
                return Err(InputError::Disabled("The order is being sent".to_string()).into());
            }
            if !state.status.valid {
                return Err(state.status.refuse("Enter an email and a phone number").into());
            }
        }
        self.bus.publish(AppEvent::ContactsSubmitted)?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let state = self.state.lock();
        let mut out = format!("Contacts\nEmail: {}\nPhone: {}\n", state.email, state.phone);

        if let Some(failure) = &state.failure {
            out.push_str(&format!("Order failed: {failure}\n"));
        }
        if state.submitting {
            out.push_str("Sending order...");
        } else {
            out.push_str(&state.status.render("Pay", "submit"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::EventKind;

    fn recording_bus() -> (Arc<EventBus>, Arc<Mutex<Vec<String>>>) {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let tap = seen.clone();
        bus.subscribe_all(move |event| {
            tap.lock().push(event.name());
            Ok(())
        });
        (bus, seen)
    }

    #[test]
    fn test_payment_inputs_publish_field_changes() {
        let (bus, seen) = recording_bus();
        let form = PaymentForm::new(bus);

        form.choose(PaymentMethod::Cash).unwrap();
        form.set_address("Main St").unwrap();

        assert_eq!(*seen.lock(), vec!["order.payment:change", "order.address:change"]);
        let text = form.render();
        assert!(text.contains("[ ] card  [x] cash"));
        assert!(text.contains("Address: Main St"));
    }

    #[test]
    fn test_submit_waits_for_valid_step() {
        let (bus, seen) = recording_bus();
        let form = PaymentForm::new(bus);

        form.set_validation(false, "Address is required".to_string());
        match form.submit() {
            Err(crate::error::AppError::Input(InputError::Disabled(msg))) => {
                assert_eq!(msg, "Address is required")
            }
            other => panic!("expected disabled submit, got {other:?}"),
        }
        assert!(form.render().contains("! Address is required\n< Next >  (disabled)"));

        form.set_validation(true, String::new());
        form.submit().unwrap();
        assert_eq!(seen.lock().last().map(String::as_str), Some("order:submit"));
    }

    #[test]
    fn test_contacts_failure_state() {
        let bus = Arc::new(EventBus::new());
        let submitted = Arc::new(Mutex::new(0));
        let counter = submitted.clone();
        bus.subscribe(EventKind::ContactsSubmitted, move |_| {
            *counter.lock() += 1;
            Ok(())
        });
        let form = ContactsForm::new(bus);

        form.set_validation(true, String::new());
        form.set_submitting();
        assert!(form.submit().is_err());
        assert!(form.render().ends_with("Sending order..."));

        form.show_failure("Неверная сумма заказа".to_string());
        assert!(form.render().contains("Order failed: Неверная сумма заказа"));
        form.submit().unwrap();
        assert_eq!(*submitted.lock(), 1);

        form.reset();
        assert_eq!(form.failure(), None);
        assert_eq!(form.status(), FormStatus::default());
    }
}
