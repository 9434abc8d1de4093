//! Order Facts
//!
//! The immutable input of the scorer, assembled once per checkout attempt.
//!
//! ## Structure
//! - `OrderFacts`: flat record the analyzers read
//! - `OrderRecord`: a finalized order as the order table stores it
//! - `CheckoutFields`: raw submitted form fields (legacy storage)
//! - `OrderSource`: picks one of the two paths from `StorageMode`

use serde::{Deserialize, Serialize};

use crate::logic::client::ClientContext;
use crate::logic::honeypot::{Cart, CartFee};

// ============================================================================
// ORDER FACTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
    pub total: f64,
}

/// Everything the seven analyzers look at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFacts {
    pub email: String,
    pub billing_country: String,
    pub shipping_country: String,
    pub amount: f64,
    pub items_count: u32,
    /// 0 = guest
    pub customer_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub payment_method: String,
    pub currency: String,
    pub order_items: Vec<OrderItem>,
    pub has_security_fee: bool,
    pub client: ClientContext,
}

impl OrderFacts {
    /// No order data at all. The client context does not count.
    pub fn is_empty(&self) -> bool {
        self.email.trim().is_empty()
            && self.first_name.trim().is_empty()
            && self.last_name.trim().is_empty()
            && self.phone.trim().is_empty()
            && self.billing_country.trim().is_empty()
            && self.shipping_country.trim().is_empty()
            && self.payment_method.trim().is_empty()
            && self.order_items.is_empty()
            && self.items_count == 0
            && self.amount == 0.0
            && self.customer_id == 0
            && !self.has_security_fee
    }

    /// Trimmed "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    /// Build facts from whichever source the storage mode selected
    pub fn collect(source: &OrderSource<'_>, client: &ClientContext) -> Self {
        let facts = match source {
            OrderSource::Finalized(order) => Self::from_order(order),
            OrderSource::Submitted { fields, cart } => Self::from_submission(fields, *cart),
        };
        facts.with_client(client.clone())
    }

    fn from_order(order: &OrderRecord) -> Self {
        Self {
            email: order.billing.email.clone(),
            billing_country: order.billing.country.clone(),
            shipping_country: order.shipping.country.clone(),
            amount: order.total,
            items_count: order.items.iter().map(|i| i.quantity).sum(),
            customer_id: order.customer_id,
            first_name: order.billing.first_name.clone(),
            last_name: order.billing.last_name.clone(),
            phone: order.billing.phone.clone(),
            payment_method: order.payment_method.clone(),
            currency: order.currency.clone(),
            order_items: order.items.clone(),
            has_security_fee: order.fees.iter().any(CartFee::is_security_fee),
            client: ClientContext::default(),
        }
    }

    fn from_submission(fields: &CheckoutFields, cart: &dyn Cart) -> Self {
        let order_items: Vec<OrderItem> = cart
            .line_items()
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                total: line.line_total,
            })
            .collect();

        Self {
            email: fields.billing_email.clone(),
            billing_country: fields.billing_country.clone(),
            shipping_country: fields.shipping_country.clone(),
            amount: cart.total(),
            items_count: order_items.iter().map(|i| i.quantity).sum(),
            customer_id: fields.customer_id,
            first_name: fields.billing_first_name.clone(),
            last_name: fields.billing_last_name.clone(),
            phone: fields.billing_phone.clone(),
            payment_method: fields.payment_method.clone(),
            currency: fields.currency.clone(),
            order_items,
            has_security_fee: cart.has_security_fee(),
            client: ClientContext::default(),
        }
    }
}

// ============================================================================
// ORDER SOURCES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
}

/// A finalized order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRecord {
    pub id: u64,
    pub customer_id: u64,
    pub billing: Address,
    pub shipping: Address,
    pub payment_method: String,
    pub currency: String,
    pub total: f64,
    pub items: Vec<OrderItem>,
    pub fees: Vec<CartFee>,
}

/// Raw checkout form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutFields {
    pub billing_email: String,
    pub billing_first_name: String,
    pub billing_last_name: String,
    pub billing_phone: String,
    pub billing_country: String,
    pub shipping_country: String,
    pub payment_method: String,
    pub currency: String,
    pub customer_id: u64,
}

/// Where the order data lives on this installation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Finalized order record when one exists
    #[default]
    OrderTable,
    /// Always the submitted fields
    Legacy,
}

pub enum OrderSource<'a> {
    Finalized(&'a OrderRecord),
    Submitted {
        fields: &'a CheckoutFields,
        cart: &'a dyn Cart,
    },
}

impl<'a> OrderSource<'a> {
    pub fn select(
        mode: StorageMode,
        order: Option<&'a OrderRecord>,
        fields: &'a CheckoutFields,
        cart: &'a dyn Cart,
    ) -> Self {
        match (mode, order) {
            (StorageMode::OrderTable, Some(order)) => OrderSource::Finalized(order),
            _ => OrderSource::Submitted { fields, cart },
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, OrderSource::Finalized(_))
    }
}
