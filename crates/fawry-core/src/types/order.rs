//! Charges, orders and line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::payment::PaymentMethod;
use crate::signing::fixed_decimal;

/// Payment details for a server-side charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub description: String,
    /// Token of a saved card; ignored for `PayAtFawry`.
    pub card_token: Option<String>,
    pub currency_code: String,
    /// Deadline for paying a `PayAtFawry` reference.
    pub payment_expiry: Option<DateTime<Utc>>,
}

impl PaymentInfo {
    pub const DEFAULT_CURRENCY: &'static str = "EGP";

    pub fn new(payment_method: PaymentMethod, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            payment_method,
            amount,
            description: description.into(),
            card_token: None,
            currency_code: Self::DEFAULT_CURRENCY.to_string(),
            payment_expiry: None,
        }
    }

    pub fn with_card_token(mut self, token: impl Into<String>) -> Self {
        self.card_token = Some(token.into());
        self
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.payment_expiry = Some(expiry);
        self
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = currency_code.into();
        self
    }

    /// Expiry as milliseconds since the Unix epoch, the gateway's wire format.
    pub fn payment_expiry_millis(&self) -> Option<i64> {
        self.payment_expiry.map(|t| t.timestamp_millis())
    }

    /// Card token as it enters the charge signature.
    ///
    /// `PayAtFawry` always signs an empty token, whatever the caller supplied.
    pub fn signed_token(&self) -> &str {
        match self.payment_method {
            PaymentMethod::PayAtFawry => "",
            _ => self.card_token.as_deref().unwrap_or(""),
        }
    }
}

/// Line item of a server-side charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeItem {
    pub item_id: i64,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ChargeItem {
    pub fn new(item_id: i64, description: impl Into<String>, price: Decimal) -> Self {
        Self {
            item_id,
            description: description.into(),
            price,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Order placed through the browser checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Description shown at the point of sale.
    pub description: String,
    /// Hours before the order expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u32>,
    pub order_items: Vec<OrderItem>,
}

impl Order {
    pub fn new(description: impl Into<String>, order_items: Vec<OrderItem>) -> Self {
        Self {
            description: description.into(),
            expiry: None,
            order_items,
        }
    }

    pub fn with_expiry_hours(mut self, hours: u32) -> Self {
        self.expiry = Some(hours);
        self
    }

    /// Sum of `price * quantity` over all items.
    pub fn total(&self) -> Decimal {
        self.order_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }

    /// JSON form embedded in the checkout charge request.
    ///
    /// The checkout script expects numbers as strings: prices with two
    /// decimals, integers verbatim. Absent fields are left out.
    pub fn checkout_json(&self) -> Value {
        let mut order = Map::new();
        order.insert("description".to_string(), json!(self.description));
        if let Some(expiry) = self.expiry {
            order.insert("expiry".to_string(), json!(expiry.to_string()));
        }
        order.insert(
            "orderItems".to_string(),
            Value::Array(self.order_items.iter().map(OrderItem::checkout_json).collect()),
        );
        Value::Object(order)
    }
}

/// Line item of a checkout order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "productSKU")]
    pub product_sku: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl OrderItem {
    pub fn new(product_sku: impl Into<String>, description: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_sku: product_sku.into(),
            description: description.into(),
            price,
            quantity: 1,
            width: None,
            height: None,
            length: None,
            weight: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    fn checkout_json(&self) -> Value {
        let mut item = Map::new();
        item.insert("productSKU".to_string(), json!(self.product_sku));
        item.insert("description".to_string(), json!(self.description));
        item.insert("price".to_string(), json!(fixed_decimal(self.price, 2)));
        item.insert("quantity".to_string(), json!(self.quantity.to_string()));
        for (key, value) in [
            ("width", self.width),
            ("height", self.height),
            ("length", self.length),
            ("weight", self.weight),
        ] {
            if let Some(value) = value {
                item.insert(key.to_string(), json!(value.to_string()));
            }
        }
        Value::Object(item)
    }
}
