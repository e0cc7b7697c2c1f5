//! Authenticated payment events fanned out to subscribers.

use chrono::{DateTime, Utc};
use fawry_core::types::{NotificationV1, NotificationV2, OrderStatus, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which callback format an event arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSource {
    V1,
    V2,
}

/// A payment notification whose signature has been verified.
///
/// Only ever built from a matched verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub source: NotificationSource,
    pub fawry_ref_number: String,
    pub merchant_ref_number: String,
    pub order_status: OrderStatus,
    pub amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub received_at: DateTime<Utc>,
}

impl From<NotificationV1> for PaymentEvent {
    fn from(n: NotificationV1) -> Self {
        Self {
            source: NotificationSource::V1,
            fawry_ref_number: n.fawry_ref_no.to_string(),
            merchant_ref_number: n.merchant_ref_no,
            order_status: n.order_status,
            amount: n.amount,
            payment_method: None,
            received_at: Utc::now(),
        }
    }
}

impl From<NotificationV2> for PaymentEvent {
    fn from(n: NotificationV2) -> Self {
        Self {
            source: NotificationSource::V2,
            fawry_ref_number: n.fawry_ref_number,
            merchant_ref_number: n.merchant_ref_number,
            order_status: n.order_status,
            amount: n.payment_amount,
            payment_method: n.payment_method,
            received_at: Utc::now(),
        }
    }
}
