//! Gateway response bodies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::customer::Card;
use super::millis_to_datetime;
use super::payment::{PaymentMethod, PaymentStatus};
use crate::{Error, Result};

/// Status block present on every gateway response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub status_code: i32,
    #[serde(default)]
    pub status_description: String,
}

impl GatewayStatus {
    pub const SUCCESS: i32 = 200;

    pub fn is_success(&self) -> bool {
        self.status_code == Self::SUCCESS
    }

    /// Turn a non-200 body status into [`Error::Gateway`].
    #[allow(clippy::result_large_err)]
    pub fn check(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::Gateway {
                status_code: self.status_code,
                description: self.status_description.clone(),
                kind: self.kind.clone(),
            })
        }
    }
}

/// Responses that carry a [`GatewayStatus`].
pub trait GatewayResponse {
    fn status(&self) -> &GatewayStatus;
}

macro_rules! gateway_response {
    ($($ty:ty),* $(,)?) => {
        $(
            impl GatewayResponse for $ty {
                fn status(&self) -> &GatewayStatus {
                    &self.status
                }
            }
        )*
    };
}

/// Result of deleting a card token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTokenResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
}

/// Result of a refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCardTokenResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
    pub card: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListCardTokensResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
    /// Fawry reference the customer pays against.
    pub reference_number: Option<String>,
    pub merchant_ref_number: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub expiration_time: Option<i64>,
}

impl CreateChargeResponse {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration_time.and_then(millis_to_datetime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
    pub reference_number: Option<String>,
    pub merchant_ref_number: Option<String>,
    #[serde(default)]
    pub payment_amount: Option<Decimal>,
    pub payment_date: Option<i64>,
    pub expiration_time: Option<i64>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
}

impl PaymentStatusResponse {
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.payment_date.and_then(millis_to_datetime)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration_time.and_then(millis_to_datetime)
    }

    /// Parsed `paymentStatus`.
    #[allow(clippy::result_large_err)]
    pub fn payment_status(&self) -> Result<PaymentStatus> {
        self.payment_status
            .as_deref()
            .ok_or(Error::MissingField {
                field: "paymentStatus",
            })?
            .parse()
    }

    /// Parsed `paymentMethod`.
    #[allow(clippy::result_large_err)]
    pub fn payment_method(&self) -> Result<PaymentMethod> {
        self.payment_method
            .as_deref()
            .ok_or(Error::MissingField {
                field: "paymentMethod",
            })?
            .parse()
    }
}

gateway_response!(
    CardTokenResponse,
    RefundResponse,
    CreateCardTokenResponse,
    ListCardTokensResponse,
    CreateChargeResponse,
    PaymentStatusResponse,
);
