//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │   OrderDraft    │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  payment        │   │  draft fields   │       │
//! │  │  title          │   │  address        │   │  total          │       │
//! │  │  category       │   │  email          │   │  items (ids)    │       │
//! │  │  price?         │   │  phone          │   └────────┬────────┘       │
//! │  └─────────────────┘   └─────────────────┘            │ POST /order    │
//! │                                                        ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │  CheckoutStep   │   │  OrderResult    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  SoftSkill      │   │  Payment        │   │  id             │       │
//! │  │  HardSkill ...  │   │  Contacts       │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Catalog category. The backend sends the Russian labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
}

impl Category {
    /// Label shown on cards.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft skill",
            Category::HardSkill => "hard skill",
            Category::Other => "other",
            Category::Additional => "additional",
            Category::Button => "button",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// Product description: the backend sends either one string or a list of
/// paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Description {
    Text(String),
    Paragraphs(Vec<String>),
}

impl Description {
    /// Returns the description split into paragraphs.
    pub fn paragraphs(&self) -> Vec<&str> {
        match self {
            Description::Text(text) => vec![text.as_str()],
            Description::Paragraphs(paragraphs) => {
                paragraphs.iter().map(String::as_str).collect()
            }
        }
    }
}

/// A purchasable item as returned by `GET /product`.
///
/// Immutable once loaded: a new catalog replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Category badge.
    pub category: Category,

    /// Price in synapses. `None` means the item is not for sale.
    pub price: Option<Money>,

    /// Optional long description for the detail view.
    #[serde(default)]
    pub description: Option<Description>,

    /// Image URI, already resolved against the CDN base.
    #[serde(default)]
    pub image: String,
}

impl CatalogItem {
    /// Items without a price can sit in the cart but cannot be ordered.
    #[inline]
    pub fn is_priceless(&self) -> bool {
        self.price.is_none()
    }

    /// Price for total calculations. Priceless items count as zero.
    #[inline]
    pub fn price_or_zero(&self) -> Money {
        self.price.unwrap_or_default()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. The payment form offers exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment.
    Card,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "online" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(ValidationError::NotAllowed {
                field: "payment".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Checkout Steps and Fields
// =============================================================================

/// One of the two checkout forms, each validated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Payment method and delivery address.
    Payment,
    /// Email and phone.
    Contacts,
}

impl CheckoutStep {
    /// Fields that belong to this step, in display order.
    pub fn fields(&self) -> &'static [OrderField] {
        match self {
            CheckoutStep::Payment => &[OrderField::Payment, OrderField::Address],
            CheckoutStep::Contacts => &[OrderField::Email, OrderField::Phone],
        }
    }

    /// Prefix used in event names (`order.address:change`).
    pub fn event_prefix(&self) -> &'static str {
        match self {
            CheckoutStep::Payment => "order",
            CheckoutStep::Contacts => "contacts",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStep::Payment => f.write_str("payment"),
            CheckoutStep::Contacts => f.write_str("contacts"),
        }
    }
}

/// A field of the order draft.
///
/// Declaration order is the order form errors are listed in: phone comes
/// before email even though the contacts form shows email first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Phone,
    Email,
}

impl OrderField {
    /// The checkout step this field is edited on.
    pub fn step(&self) -> CheckoutStep {
        match self {
            OrderField::Payment | OrderField::Address => CheckoutStep::Payment,
            OrderField::Email | OrderField::Phone => CheckoutStep::Contacts,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Payment => "payment",
            OrderField::Address => "address",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(OrderField::Payment),
            "address" => Ok(OrderField::Address),
            "email" => Ok(OrderField::Email),
            "phone" => Ok(OrderField::Phone),
            other => Err(ValidationError::NotAllowed {
                field: other.to_string(),
                allowed: vec![
                    "payment".to_string(),
                    "address".to_string(),
                    "email".to_string(),
                    "phone".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Order Draft
// =============================================================================

/// Checkout form state accumulated across both steps.
///
/// Empty strings and `None` mean "not filled in yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl OrderDraft {
    /// True when nothing has been entered on either step.
    pub fn is_empty(&self) -> bool {
        self.payment.is_none()
            && self.address.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
    }

    /// Text value of a field, as a form would display it.
    pub fn value(&self, field: OrderField) -> &str {
        match field {
            OrderField::Payment => self.payment.map(|m| m.as_str()).unwrap_or(""),
            OrderField::Address => &self.address,
            OrderField::Email => &self.email,
            OrderField::Phone => &self.phone,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Body of `POST /order`.
///
/// Built by [`crate::store::AppState::build_order`] only after both steps
/// validate, so `payment` is never empty here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Cart total at submission time.
    pub total: Money,
    /// Cart item ids in cart order.
    pub items: Vec<String>,
}

/// Response of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderResult {
    pub id: String,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_from_backend_json() {
        let json = r#"{
            "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
            "description": "Если планируете решать задачи в тренажёре, берите два.",
            "image": "/5_Dots.svg",
            "title": "+1 час в сутках",
            "category": "софт-скил",
            "price": 750
        }"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, Category::SoftSkill);
        assert_eq!(item.price, Some(Money::from_synapses(750)));
        assert!(!item.is_priceless());
    }

    #[test]
    fn test_priceless_item() {
        let json = r#"{"id":"b","title":"Мамка-таймер","category":"другое","price":null}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();

        assert!(item.is_priceless());
        assert_eq!(item.price_or_zero(), Money::zero());
        assert!(item.description.is_none());
    }

    #[test]
    fn test_description_paragraphs() {
        let text = Description::Text("one".to_string());
        assert_eq!(text.paragraphs(), vec!["one"]);

        let list: Description = serde_json::from_str(r#"["one", "two"]"#).unwrap();
        assert_eq!(list.paragraphs(), vec!["one", "two"]);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("online".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(" Cash ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("barter".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_field_steps() {
        assert_eq!(OrderField::Payment.step(), CheckoutStep::Payment);
        assert_eq!(OrderField::Address.step(), CheckoutStep::Payment);
        assert_eq!(OrderField::Email.step(), CheckoutStep::Contacts);
        assert_eq!(OrderField::Phone.step(), CheckoutStep::Contacts);

        for step in [CheckoutStep::Payment, CheckoutStep::Contacts] {
            assert!(step.fields().iter().all(|f| f.step() == step));
        }
    }

    #[test]
    fn test_order_serializes_wire_shape() {
        let order = Order {
            payment: PaymentMethod::Cash,
            address: "Main St".to_string(),
            email: "a@b.c".to_string(),
            phone: "+7000".to_string(),
            total: Money::from_synapses(100),
            items: vec!["a".to_string()],
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["payment"], "cash");
        assert_eq!(value["total"], 100);
        assert_eq!(value["items"][0], "a");
    }

    #[test]
    fn test_draft_values() {
        let mut draft = OrderDraft::default();
        assert!(draft.is_empty());
        assert_eq!(draft.value(OrderField::Payment), "");

        draft.payment = Some(PaymentMethod::Card);
        assert_eq!(draft.value(OrderField::Payment), "card");
        assert!(!draft.is_empty());
    }
}
