//! Inbound payment notifications.
//!
//! Two incompatible shapes coexist: the legacy V1 callback is a flat set of
//! key/value pairs signed with MD5, the V2 callback is a JSON document signed
//! with SHA-256. Neither may be trusted before its signature is verified.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::millis_to_datetime;
use super::payment::{OrderStatus, PaymentMethod};
use crate::{Error, Result};

/// Legacy V1 notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationV1 {
    pub merchant_ref_no: String,
    pub fawry_ref_no: i64,
    pub order_status: OrderStatus,
    pub amount: Decimal,
    pub message_signature: String,
}

impl NotificationV1 {
    pub const MERCHANT_REF_NO: &'static str = "MerchantRefNo";
    pub const FAWRY_REF_NO: &'static str = "FawryRefNo";
    pub const ORDER_STATUS: &'static str = "OrderStatus";
    pub const AMOUNT: &'static str = "Amount";
    pub const MESSAGE_SIGNATURE: &'static str = "MessageSignature";

    /// Parse the callback's key/value pairs. Keys are matched case-insensitively.
    #[allow(clippy::result_large_err)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let lookup = |field| find_pair(&pairs, field);

        Ok(Self {
            merchant_ref_no: lookup(Self::MERCHANT_REF_NO)?.to_string(),
            fawry_ref_no: lookup(Self::FAWRY_REF_NO)?
                .trim()
                .parse()
                .map_err(|e| Error::invalid(Self::FAWRY_REF_NO, e))?,
            order_status: lookup(Self::ORDER_STATUS)?.parse()?,
            amount: Decimal::from_str(lookup(Self::AMOUNT)?.trim())
                .map_err(|e| Error::invalid(Self::AMOUNT, e))?,
            message_signature: lookup(Self::MESSAGE_SIGNATURE)?.to_string(),
        })
    }
}

#[allow(clippy::result_large_err)]
fn find_pair<'a, K, V>(pairs: &'a [(K, V)], field: &'static str) -> Result<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .find(|(k, _)| k.as_ref().eq_ignore_ascii_case(field))
        .map(|(_, v)| v.as_ref())
        .ok_or(Error::MissingField { field })
}

/// Line item echoed back in a V2 notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOrderItem {
    pub item_code: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Current V2 notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationV2 {
    #[serde(default)]
    pub request_id: Option<String>,
    pub fawry_ref_number: String,
    pub merchant_ref_number: String,
    #[serde(default)]
    pub customer_mobile: Option<String>,
    #[serde(default)]
    pub customer_mail: Option<String>,
    pub payment_amount: Decimal,
    pub order_amount: Decimal,
    #[serde(default)]
    pub fawry_fees: Option<Decimal>,
    #[serde(default)]
    pub shipping_fees: Option<Decimal>,
    pub order_status: OrderStatus,
    /// Absent until the customer has chosen how to pay.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub message_signature: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub order_expiry_date: Option<i64>,
    #[serde(default)]
    pub order_items: Vec<NotificationOrderItem>,
}

impl NotificationV2 {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn order_expires_at(&self) -> Option<DateTime<Utc>> {
        self.order_expiry_date.and_then(millis_to_datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V2_EXAMPLE: &str = r#"{
        "requestId": "c72827d084ea4b88949d91dd2db4996e",
        "fawryRefNumber": "970177",
        "merchantRefNumber": "9708f1cea8b5426cb57922df51b7f790",
        "customerMobile": "01004545545",
        "customerMail": "fawry@fawry.com",
        "paymentAmount": 152.00,
        "orderAmount": 150.00,
        "fawryFees": 2.00,
        "shippingFees": null,
        "orderStatus": "NEW",
        "paymentMethod": "PAYATFAWRY",
        "messageSignature": "eab2c9588f0f0cf0f007e2c93f4b6ac91ba38de1023d123ceb0f6ca90a172372",
        "orderExpiryDate": 1533554719314,
        "orderItems": [{
            "itemCode": "e6aacbd5a498487ab1a10ae71061535d",
            "price": 150.0,
            "quantity": 1
        }]
    }"#;

    #[test]
    fn test_v1_from_pairs() {
        let notification = NotificationV1::from_pairs([
            ("MerchantRefNo", "128161"),
            ("FawryRefNo", "946610689"),
            ("OrderStatus", "PAID"),
            ("Amount", "150.0"),
            ("MessageSignature", "4E8EE4A2C3B09946CA0717E3E91845B9"),
        ])
        .unwrap();

        assert_eq!(notification.merchant_ref_no, "128161");
        assert_eq!(notification.fawry_ref_no, 946610689);
        assert_eq!(notification.order_status, OrderStatus::Paid);
        assert_eq!(notification.amount, Decimal::from(150));
    }

    #[test]
    fn test_v1_keys_case_insensitive() {
        let notification = NotificationV1::from_pairs([
            ("merchantRefNo", "1"),
            ("fawryrefno", "2"),
            ("ORDERSTATUS", "new"),
            ("amount", "3"),
            ("messageSignature", "x"),
        ])
        .unwrap();
        assert_eq!(notification.order_status, OrderStatus::New);
    }

    #[test]
    fn test_v1_missing_field() {
        let result = NotificationV1::from_pairs([
            ("MerchantRefNo", "128161"),
            ("FawryRefNo", "946610689"),
            ("OrderStatus", "PAID"),
            ("Amount", "150.0"),
        ]);
        assert!(matches!(
            result,
            Err(Error::MissingField {
                field: "MessageSignature"
            })
        ));
    }

    #[test]
    fn test_v1_invalid_reference() {
        let result = NotificationV1::from_pairs([
            ("MerchantRefNo", "128161"),
            ("FawryRefNo", "not-a-number"),
            ("OrderStatus", "PAID"),
            ("Amount", "150.0"),
            ("MessageSignature", "x"),
        ]);
        assert!(matches!(
            result,
            Err(Error::InvalidField {
                field: "FawryRefNo",
                ..
            })
        ));
    }

    #[test]
    fn test_v2_from_json() {
        let notification = NotificationV2::from_json(V2_EXAMPLE).unwrap();

        assert_eq!(notification.fawry_ref_number, "970177");
        assert_eq!(notification.payment_amount, Decimal::from(152));
        assert_eq!(notification.order_amount, Decimal::from(150));
        assert_eq!(notification.shipping_fees, None);
        assert_eq!(notification.order_status, OrderStatus::New);
        assert_eq!(notification.payment_method, Some(PaymentMethod::PayAtFawry));
        assert_eq!(notification.order_items.len(), 1);
        assert_eq!(
            notification.order_expires_at().unwrap().timestamp_millis(),
            1533554719314
        );
    }

    #[test]
    fn test_v2_missing_required_field() {
        let result = NotificationV2::from_json(r#"{"fawryRefNumber":"1"}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
