//! Payment enums shared by requests, responses and notifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::signing::Symbolic;
use crate::Error;

/// Finds the variant whose symbol matches `s`, ignoring ASCII case.
fn parse_symbol<T: Symbolic + Copy>(
    all: &[T],
    s: &str,
    field: &'static str,
) -> Result<T, Error> {
    all.iter()
        .copied()
        .find(|v| v.symbol().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| Error::invalid(field, format!("unknown value {:?}", s)))
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum PaymentMethod {
    /// Cash at a Fawry outlet against a reference number.
    PayAtFawry,
    CashOnDelivery,
    Card,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::PayAtFawry,
        PaymentMethod::CashOnDelivery,
        PaymentMethod::Card,
        PaymentMethod::Wallet,
    ];
}

impl Symbolic for PaymentMethod {
    fn symbol(&self) -> &'static str {
        match self {
            PaymentMethod::PayAtFawry => "PayAtFawry",
            PaymentMethod::CashOnDelivery => "CashOnDelivery",
            PaymentMethod::Card => "Card",
            PaymentMethod::Wallet => "Wallet",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol(&Self::ALL, s, "paymentMethod")
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Order state reported by notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum OrderStatus {
    New,
    Paid,
    Canceled,
    Delivered,
    Refunded,
    Expired,
    Failed,
    /// Failure reported with the gateway's `ORDER_FAILED` literal. Signs as `FAILED`.
    #[serde(rename = "ORDER_FAILED")]
    OrderFailed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::New,
        OrderStatus::Paid,
        OrderStatus::Canceled,
        OrderStatus::Delivered,
        OrderStatus::Refunded,
        OrderStatus::Expired,
        OrderStatus::Failed,
        OrderStatus::OrderFailed,
    ];

    /// Whether the order has been paid for.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Delivered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OrderStatus::Failed | OrderStatus::OrderFailed)
    }
}

impl Symbolic for OrderStatus {
    fn symbol(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Paid => "Paid",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Refunded => "Refunded",
            OrderStatus::Expired => "Expired",
            OrderStatus::Failed => "Failed",
            OrderStatus::OrderFailed => "ORDER_FAILED",
        }
    }

    fn signed_symbol(&self) -> &'static str {
        match self {
            // Alias of `Failed` on the gateway side.
            OrderStatus::OrderFailed => "Failed",
            other => other.symbol(),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol(&Self::ALL, s, "orderStatus")
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Payment state returned by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Refunded,
    Expired,
    Cancelled,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 6] = [
        PaymentStatus::Paid,
        PaymentStatus::Unpaid,
        PaymentStatus::Refunded,
        PaymentStatus::Expired,
        PaymentStatus::Cancelled,
        PaymentStatus::Failed,
    ];
}

impl Symbolic for PaymentStatus {
    fn symbol(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Expired => "Expired",
            PaymentStatus::Cancelled => "Cancelled",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol(&Self::ALL, s, "paymentStatus")
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Language of the hosted checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChargeRequestLanguage {
    #[default]
    #[serde(rename = "ar-eg")]
    Ar,
    #[serde(rename = "en-gb")]
    En,
}

impl ChargeRequestLanguage {
    pub fn locale(&self) -> &'static str {
        match self {
            ChargeRequestLanguage::Ar => "ar-eg",
            ChargeRequestLanguage::En => "en-gb",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parses_any_case() {
        assert_eq!(
            "PAYATFAWRY".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::PayAtFawry
        );
        assert_eq!(
            "payAtFawry".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::PayAtFawry
        );
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("BITCOIN".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serde_uses_upper_symbol() {
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap();
        assert_eq!(json, "\"CASHONDELIVERY\"");

        let parsed: PaymentMethod = serde_json::from_str("\"Wallet\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Wallet);
    }

    #[test]
    fn test_order_failed_keeps_gateway_literal() {
        let parsed: OrderStatus = serde_json::from_str("\"ORDER_FAILED\"").unwrap();
        assert_eq!(parsed, OrderStatus::OrderFailed);
        assert!(parsed.is_failed());
        assert_eq!(
            serde_json::to_string(&OrderStatus::OrderFailed).unwrap(),
            "\"ORDER_FAILED\""
        );
    }

    #[test]
    fn test_unknown_order_status_rejected() {
        let result: Result<OrderStatus, _> = serde_json::from_str("\"LOST\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(
            "UNPAID".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_language_locale() {
        assert_eq!(ChargeRequestLanguage::Ar.locale(), "ar-eg");
        assert_eq!(
            serde_json::to_string(&ChargeRequestLanguage::En).unwrap(),
            "\"en-gb\""
        );
    }
}
